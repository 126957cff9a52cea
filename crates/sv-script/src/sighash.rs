//! Transaction digests signed by CHECKSIG and CHECKMULTISIG.
//!
//! Two algorithms exist. Outputs protected by the fork id (and any input when
//! [`VerifyFlags::BIP143_SIGHASH`] is set) use a BIP143 style preimage that
//! commits to the spent amount, everything else uses the legacy digest.

use crate::VerifyFlags;
use crate::constants::{
    SIGHASH_ANYONECANPAY, SIGHASH_BASE_MASK, SIGHASH_FORKID, SIGHASH_NONE, SIGHASH_SINGLE,
};
use crate::error::Error;
use bitcoin::consensus::encode::{VarInt, serialize};
use bitcoin::hashes::{Hash, HashEngine, sha256d};
use bitcoin::sighash::SighashCache;
use bitcoin::{Amount, Script, Transaction};

const LOG_TARGET: &str = "sv_script::sighash";

/// The per-transaction components of the fork id digest.
///
/// They do not depend on the input being signed and are computed once for
/// all inputs of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigHashes {
    pub hash_prevouts: sha256d::Hash,
    pub hash_sequence: sha256d::Hash,
    pub hash_outputs: sha256d::Hash,
}

impl SigHashes {
    pub fn new(tx: &Transaction) -> Self {
        let mut prevouts = sha256d::Hash::engine();
        let mut sequence = sha256d::Hash::engine();
        for input in &tx.input {
            prevouts.input(&serialize(&input.previous_output));
            sequence.input(&input.sequence.0.to_le_bytes());
        }

        let mut outputs = sha256d::Hash::engine();
        for output in &tx.output {
            outputs.input(&serialize(output));
        }

        Self {
            hash_prevouts: sha256d::Hash::from_engine(prevouts),
            hash_sequence: sha256d::Hash::from_engine(sequence),
            hash_outputs: sha256d::Hash::from_engine(outputs),
        }
    }
}

/// Whether a signature with `sighash_type` commits to the fork id digest.
pub fn uses_fork_id_digest(sighash_type: u32, flags: VerifyFlags) -> bool {
    (flags.verify_sighash_forkid() && sighash_type & SIGHASH_FORKID != 0)
        || flags.verify_bip143_sighash()
}

/// Computes the digest signed for input `input_index` of `tx`.
///
/// `script_code` is the subscript the signature commits to, `amount` the value
/// of the spent output. `hashes` may carry the precomputed transaction wide
/// components, they are computed on the fly otherwise.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    amount: Amount,
    sighash_type: u32,
    flags: VerifyFlags,
    hashes: Option<&SigHashes>,
) -> Result<[u8; 32], Error> {
    let out_of_range = || Error::InputIndexOutOfRange {
        index: input_index,
        inputs: tx.input.len(),
    };

    if input_index >= tx.input.len() {
        return Err(out_of_range());
    }

    if uses_fork_id_digest(sighash_type, flags) {
        let computed;
        let hashes = match hashes {
            Some(hashes) => hashes,
            None => {
                computed = SigHashes::new(tx);
                &computed
            }
        };

        return Ok(fork_id_signature_hash(
            tx,
            input_index,
            script_code,
            amount,
            sighash_type,
            hashes,
        ));
    }

    tracing::trace!(
        target: LOG_TARGET,
        "Computing legacy sighash of input #{input_index}, type: 0x{sighash_type:x}"
    );

    let hash = SighashCache::new(tx)
        .legacy_signature_hash(input_index, Script::from_bytes(script_code), sighash_type)
        .map_err(|_| out_of_range())?;

    Ok(hash.to_byte_array())
}

fn fork_id_signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    amount: Amount,
    sighash_type: u32,
    hashes: &SigHashes,
) -> [u8; 32] {
    let base_type = sighash_type & SIGHASH_BASE_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;
    let zero = sha256d::Hash::all_zeros();

    let hash_prevouts = if anyone_can_pay {
        zero
    } else {
        hashes.hash_prevouts
    };

    let hash_sequence =
        if anyone_can_pay || base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE {
            zero
        } else {
            hashes.hash_sequence
        };

    let hash_outputs = match base_type {
        SIGHASH_SINGLE => tx
            .output
            .get(input_index)
            .map_or(zero, |output| sha256d::Hash::hash(&serialize(output))),
        SIGHASH_NONE => zero,
        _ => hashes.hash_outputs,
    };

    let input = &tx.input[input_index];

    let mut preimage = Vec::with_capacity(156 + script_code.len());
    preimage.extend_from_slice(&tx.version.0.to_le_bytes());
    preimage.extend_from_slice(hash_prevouts.as_byte_array());
    preimage.extend_from_slice(hash_sequence.as_byte_array());
    preimage.extend_from_slice(&serialize(&input.previous_output));
    preimage.extend_from_slice(&serialize(&VarInt(script_code.len() as u64)));
    preimage.extend_from_slice(script_code);
    preimage.extend_from_slice(&amount.to_sat().to_le_bytes());
    preimage.extend_from_slice(&input.sequence.0.to_le_bytes());
    preimage.extend_from_slice(hash_outputs.as_byte_array());
    preimage.extend_from_slice(&tx.lock_time.to_consensus_u32().to_le_bytes());
    preimage.extend_from_slice(&sighash_type.to_le_bytes());

    tracing::trace!(
        target: LOG_TARGET,
        "Fork id sighash preimage of input #{input_index}: {}",
        hex::encode(&preimage)
    );

    sha256d::Hash::hash(&preimage).to_byte_array()
}
