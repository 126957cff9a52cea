use super::sig::{uses_fork_id, verify_signature};
use crate::error::Error;
use crate::interpreter::Thread;
use crate::num::ScriptNum;
use crate::parser::ParsedOpcode;
use crate::stack::Stack;

/// Multisig error type.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CheckMultiSigError {
    #[error("invalid number of pubkeys {0}")]
    InvalidPubkeyCount(i64),
    #[error("invalid number of signatures {count}, expected in the range of [0, {keys}]")]
    InvalidSignatureCount { count: i64, keys: usize },
    #[error("multisig dummy argument has length {0} instead of 0")]
    SignatureNullDummy(usize),
}

pub(crate) fn op_checkmultisig(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result<(), Error> {
    let success = eval_checkmultisig(t)?;
    t.dstack.push_bool(success);
    Ok(())
}

pub(crate) fn op_checkmultisig_verify(
    _op: &ParsedOpcode,
    t: &mut Thread<'_>,
) -> Result<(), Error> {
    if !eval_checkmultisig(t)? {
        return Err(Error::CheckMultiSigVerify);
    }
    Ok(())
}

/// Pops `count` elements, the top of the stack first.
fn pop_items(stack: &mut Stack, count: usize) -> Result<Vec<Vec<u8>>, Error> {
    let mut items = Vec::with_capacity(count.min(stack.len()));
    for _ in 0..count {
        items.push(stack.pop()?);
    }
    Ok(items)
}

fn count_in_range(n: &ScriptNum, max: usize) -> Option<usize> {
    n.to_i64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n <= max)
}

fn eval_checkmultisig(t: &mut Thread<'_>) -> Result<bool, Error> {
    // ([dummy] [sig ...] num_of_signatures [pubkey ...] num_of_pubkeys -- bool)

    let keys_count = t.dstack.pop_num()?;
    let keys_count = count_in_range(&keys_count, t.config.max_pubkeys_per_multisig)
        .ok_or_else(|| {
            CheckMultiSigError::InvalidPubkeyCount(keys_count.to_i64().unwrap_or(i64::MAX))
        })?;

    t.num_ops = t.num_ops.saturating_add(keys_count);

    if t.num_ops > t.config.max_ops {
        return Err(Error::TooManyOperations(t.config.max_ops));
    }

    let keys = pop_items(&mut t.dstack, keys_count)?;

    let sigs_count = t.dstack.pop_num()?;
    let sigs_count = count_in_range(&sigs_count, keys_count).ok_or_else(|| {
        CheckMultiSigError::InvalidSignatureCount {
            count: sigs_count.to_i64().unwrap_or(i64::MAX),
            keys: keys_count,
        }
    })?;

    let sigs = pop_items(&mut t.dstack, sigs_count)?;

    // A bug in the original Satoshi client implementation means one more
    // stack value than should be used must be popped.  Unfortunately, this
    // buggy behavior is now part of the consensus and a hard fork would be
    // required to fix it.
    let dummy = t.dstack.pop()?;

    // Since the dummy argument is otherwise not checked, it could be any
    // value which unfortunately provides a source of malleability.  Thus,
    // there is a script flag to force an error when the value is NOT 0.
    if t.flags.verify_nulldummy() && !dummy.is_empty() {
        return Err(CheckMultiSigError::SignatureNullDummy(dummy.len()).into());
    }

    // Legacy signatures can't sign themselves.
    let flags = t.flags;
    let legacy_sigs = sigs
        .iter()
        .filter(|sig| !uses_fork_id(sig, flags))
        .map(Vec::as_slice);
    let script_code = t.sub_script().legacy_subscript(legacy_sigs).unparse()?;

    // Keys and signatures are both matched from the top of the stack down,
    // a key that fails a signature is never tried again.
    let mut success = true;
    let mut checked_keys_count = 0;
    let mut satisfied_sigs_count = 0;

    while satisfied_sigs_count < sigs.len() && success {
        let key = &keys[checked_keys_count];
        let sig = &sigs[satisfied_sigs_count];

        if verify_signature(t, sig, key, &script_code)? {
            satisfied_sigs_count += 1;
        }

        checked_keys_count += 1;

        // Early exit if remaining keys can't satisfy remaining signatures.
        success = keys.len() - checked_keys_count >= sigs.len() - satisfied_sigs_count;
    }

    if !success && t.flags.verify_nullfail() && sigs.iter().any(|sig| !sig.is_empty()) {
        return Err(super::CheckSigError::NullFail.into());
    }

    Ok(success)
}
