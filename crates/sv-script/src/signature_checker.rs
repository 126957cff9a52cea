use crate::cache::{SigCache, SigHashCache};
use crate::constants::{
    LOCKTIME_THRESHOLD, SEQUENCE_FINAL, SEQUENCE_LOCKTIME_DISABLE_FLAG, SEQUENCE_LOCKTIME_MASK,
    SEQUENCE_LOCKTIME_TYPE_FLAG,
};
use crate::error::Error;
use crate::num::ScriptNum;
use crate::sighash::{SigHashes, signature_hash, uses_fork_id_digest};
use crate::VerifyFlags;
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, VerifyOnly};
use bitcoin::{Amount, Transaction};
use std::sync::{Arc, LazyLock, OnceLock};

static SECP: LazyLock<Secp256k1<VerifyOnly>> = LazyLock::new(Secp256k1::verification_only);

/// Checks signatures and lock times against the spending transaction.
pub trait SignatureChecker {
    /// Verifies `sig` by `pubkey` over the digest selected by `sighash_type`
    /// and `flags`, committing to `script_code`.
    fn check_sig(
        &self,
        sig: &Signature,
        pubkey: &PublicKey,
        script_code: &[u8],
        sighash_type: u32,
        flags: VerifyFlags,
    ) -> Result<bool, Error>;

    fn check_lock_time(&self, lock_time: &ScriptNum) -> bool;

    fn check_sequence(&self, sequence: &ScriptNum) -> bool;
}

/// Accepts every signature and lock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignatureCheck;

impl SignatureChecker for NoSignatureCheck {
    fn check_sig(
        &self,
        _sig: &Signature,
        _pubkey: &PublicKey,
        _script_code: &[u8],
        _sighash_type: u32,
        _flags: VerifyFlags,
    ) -> Result<bool, Error> {
        Ok(true)
    }

    fn check_lock_time(&self, _lock_time: &ScriptNum) -> bool {
        true
    }

    fn check_sequence(&self, _sequence: &ScriptNum) -> bool {
        true
    }
}

/// Checks signatures of one input of a transaction.
pub struct TransactionSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
    amount: Amount,
    sig_hashes: OnceLock<SigHashes>,
    sig_hash_cache: Option<Arc<SigHashCache>>,
    sig_cache: Option<Arc<SigCache>>,
}

impl<'a> TransactionSignatureChecker<'a> {
    /// Creates a checker for input `input_index` of `tx` spending an output
    /// worth `amount`.
    pub fn new(tx: &'a Transaction, input_index: usize, amount: Amount) -> Self {
        Self {
            tx,
            input_index,
            amount,
            sig_hashes: OnceLock::new(),
            sig_hash_cache: None,
            sig_cache: None,
        }
    }

    pub fn with_sig_hash_cache(mut self, cache: Arc<SigHashCache>) -> Self {
        self.sig_hash_cache = Some(cache);
        self
    }

    pub fn with_sig_cache(mut self, cache: Arc<SigCache>) -> Self {
        self.sig_cache = Some(cache);
        self
    }

    fn sig_hashes(&self) -> &SigHashes {
        self.sig_hashes.get_or_init(|| match &self.sig_hash_cache {
            Some(cache) => cache.add_sig_hashes(self.tx),
            None => SigHashes::new(self.tx),
        })
    }

    fn tx_sequence(&self) -> Option<u32> {
        self.tx
            .input
            .get(self.input_index)
            .map(|input| input.sequence.0)
    }
}

impl std::fmt::Debug for TransactionSignatureChecker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSignatureChecker")
            .field("txid", &self.tx.compute_txid())
            .field("input_index", &self.input_index)
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn check_sig(
        &self,
        sig: &Signature,
        pubkey: &PublicKey,
        script_code: &[u8],
        sighash_type: u32,
        flags: VerifyFlags,
    ) -> Result<bool, Error> {
        let hashes = uses_fork_id_digest(sighash_type, flags).then(|| self.sig_hashes());

        let sighash = signature_hash(
            self.tx,
            self.input_index,
            script_code,
            self.amount,
            sighash_type,
            flags,
            hashes,
        )?;

        // libsecp256k1 only accepts lower S signatures, the encoding rules
        // decide whether a high S is acceptable.
        let mut sig = *sig;
        sig.normalize_s();

        if let Some(cache) = &self.sig_cache {
            if cache.exists(&sighash, &sig, pubkey) {
                return Ok(true);
            }
        }

        let msg = Message::from_digest(sighash);
        let valid = SECP.verify_ecdsa(&msg, &sig, pubkey).is_ok();

        if valid {
            if let Some(cache) = &self.sig_cache {
                cache.add(&sighash, &sig, pubkey);
            }
        }

        Ok(valid)
    }

    fn check_lock_time(&self, lock_time: &ScriptNum) -> bool {
        let Some(lock_time) = lock_time.to_i64() else {
            return false;
        };
        let tx_lock_time = i64::from(self.tx.lock_time.to_consensus_u32());

        // There are two kinds of nLockTime: lock-by-blockheight and
        // lock-by-blocktime, distinguished by whether nLockTime <
        // LOCKTIME_THRESHOLD. Only comparisons of the same kind are valid.
        if (tx_lock_time < LOCKTIME_THRESHOLD) != (lock_time < LOCKTIME_THRESHOLD) {
            return false;
        }

        if lock_time > tx_lock_time {
            return false;
        }

        // A final input disables nLockTime and would bypass the check.
        self.tx_sequence()
            .is_some_and(|sequence| sequence != SEQUENCE_FINAL)
    }

    fn check_sequence(&self, sequence: &ScriptNum) -> bool {
        let Some(sequence) = sequence.to_i64() else {
            return false;
        };
        let Some(tx_sequence) = self.tx_sequence().map(i64::from) else {
            return false;
        };

        // Relative lock times are only enforced from version 2 on.
        if self.tx.version.0 < 2 {
            return false;
        }

        if tx_sequence & i64::from(SEQUENCE_LOCKTIME_DISABLE_FLAG) != 0 {
            return false;
        }

        let type_flag = i64::from(SEQUENCE_LOCKTIME_TYPE_FLAG);
        let mask = type_flag | i64::from(SEQUENCE_LOCKTIME_MASK);
        let tx_sequence = tx_sequence & mask;
        let sequence = sequence & mask;

        if (tx_sequence < type_flag) != (sequence < type_flag) {
            return false;
        }

        sequence <= tx_sequence
    }
}
