//! Opcode handlers.
//!
//! Every handler has the [`OpcodeHandler`](crate::opcode::OpcodeHandler)
//! signature and is referenced from the opcode table.

mod multisig;
mod sig;

use super::thread::{Condition, Thread};
use crate::constants::{LOCKTIME_NUM_SIZE, SEQUENCE_LOCKTIME_DISABLE_FLAG};
use crate::error::Error;
use crate::num::{ScriptNum, minimally_encode};
use crate::opcode::{OP_1, OP_NOP1, OP_NOP10};
use crate::parser::ParsedOpcode;
use crate::stack::{StackError, cast_to_bool};
use bitcoin::hashes::{Hash, hash160, ripemd160, sha1, sha256, sha256d};

pub use self::multisig::CheckMultiSigError;
pub(crate) use self::multisig::{op_checkmultisig, op_checkmultisig_verify};
pub use self::sig::{CheckSigError, SignatureEncodingError};
pub(crate) use self::sig::{op_checksig, op_checksig_verify};

type Result<T = ()> = std::result::Result<T, Error>;

///////////////////////////
// Push operations.
///////////////////////////

pub(crate) fn op_false(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    t.dstack.push(Vec::new());
    Ok(())
}

pub(crate) fn op_push_data(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    t.dstack.push(op.data.clone());
    Ok(())
}

pub(crate) fn op_1negate(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    t.dstack.push_num(-1);
    Ok(())
}

/// OP_1 through OP_16.
pub(crate) fn op_n(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    t.dstack.push_num(i64::from(op.value() - (OP_1 - 1)));
    Ok(())
}

///////////////////////////
// Illegal operations.
///////////////////////////

pub(crate) fn op_disabled(op: &ParsedOpcode, _t: &mut Thread<'_>) -> Result {
    Err(Error::DisabledOpcode(op.name()))
}

pub(crate) fn op_reserved(op: &ParsedOpcode, _t: &mut Thread<'_>) -> Result {
    Err(Error::ReservedOpcode(op.name()))
}

/// OP_VERIF and OP_VERNOTIF.
pub(crate) fn op_ver_conditional(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if t.after_genesis && !t.should_exec(op) {
        return Ok(());
    }
    op_reserved(op, t)
}

pub(crate) fn op_invalid(op: &ParsedOpcode, _t: &mut Thread<'_>) -> Result {
    Err(Error::InvalidOpcode(op.name()))
}

///////////////////////////
// Flow control.
///////////////////////////

pub(crate) fn op_nop(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if (OP_NOP1..=OP_NOP10).contains(&op.value()) && t.flags.verify_discourage_upgradable_nops() {
        return Err(Error::DiscourageUpgradableNops(op.name()));
    }
    Ok(())
}

/// Pops the operand of OP_IF and OP_NOTIF.
fn pop_if_bool(t: &mut Thread<'_>) -> Result<bool> {
    if !t.flags.verify_minimalif() {
        return Ok(t.dstack.pop_bool()?);
    }

    let value = t.dstack.pop()?;

    match value.as_slice() {
        [] => Ok(false),
        [1] => Ok(true),
        _ => Err(Error::MinimalIf),
    }
}

fn eval_if(op: &ParsedOpcode, t: &mut Thread<'_>, negate: bool) -> Result {
    let mut cond = Condition::False;

    if t.should_exec(op) {
        if t.is_branch_executing() {
            if pop_if_bool(t)? != negate {
                cond = Condition::True;
            }
        } else {
            cond = Condition::Skip;
        }
    }

    t.cond_stack.push(cond);
    t.else_stack.push(false);

    Ok(())
}

pub(crate) fn op_if(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_if(op, t, false)
}

pub(crate) fn op_notif(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_if(op, t, true)
}

pub(crate) fn op_else(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let (Some(cond), Some(seen_else)) = (t.cond_stack.last_mut(), t.else_stack.last_mut()) else {
        return Err(Error::UnbalancedConditional);
    };

    // Only one ELSE is allowed per IF after genesis.
    if t.after_genesis && *seen_else {
        return Err(Error::UnbalancedConditional);
    }
    *seen_else = true;

    *cond = match *cond {
        Condition::True => Condition::False,
        Condition::False => Condition::True,
        Condition::Skip => Condition::Skip,
    };

    Ok(())
}

pub(crate) fn op_endif(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if t.cond_stack.pop().is_none() {
        return Err(Error::UnbalancedConditional);
    }
    t.else_stack.pop();
    Ok(())
}

pub(crate) fn op_verify(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if !t.dstack.pop_bool()? {
        return Err(Error::Verify);
    }
    Ok(())
}

pub(crate) fn op_return(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if !t.after_genesis {
        return Err(Error::EarlyReturn);
    }

    t.early_return_after_genesis = true;

    // Outside of any conditional block the rest of the script is irrelevant,
    // even if it is unbalanced or contains invalid opcodes.
    if t.cond_stack.is_empty() {
        t.pending_return = true;
    }

    Ok(())
}

/// Returns `true` when a locktime opcode should be treated as a NOP.
fn locktime_as_nop(op: &ParsedOpcode, t: &Thread<'_>, enabled: bool) -> Result<bool> {
    if enabled && !t.after_genesis {
        return Ok(false);
    }

    if t.flags.verify_discourage_upgradable_nops() {
        return Err(Error::DiscourageUpgradableNops(op.name()));
    }

    Ok(true)
}

pub(crate) fn op_check_lock_time_verify(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if locktime_as_nop(op, t, t.flags.verify_locktime())? {
        return Ok(());
    }

    // The lock time is a 5-byte number, 4 bytes would overflow in 2038.
    let lock_time = t.dstack.peek_num(0, LOCKTIME_NUM_SIZE)?;

    if lock_time.is_negative() {
        return Err(Error::NegativeLockTime);
    }

    if !t.checker.check_lock_time(&lock_time) {
        return Err(Error::UnsatisfiedLockTime);
    }

    Ok(())
}

pub(crate) fn op_check_sequence_verify(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    if locktime_as_nop(op, t, t.flags.verify_checksequence())? {
        return Ok(());
    }

    let sequence = t.dstack.peek_num(0, LOCKTIME_NUM_SIZE)?;

    if sequence.is_negative() {
        return Err(Error::NegativeLockTime);
    }

    // A sequence with the disable flag set makes the opcode a NOP.
    let disabled = sequence
        .to_i64()
        .is_some_and(|sequence| sequence & i64::from(SEQUENCE_LOCKTIME_DISABLE_FLAG) != 0);
    if disabled {
        return Ok(());
    }

    if !t.checker.check_sequence(&sequence) {
        return Err(Error::UnsatisfiedLockTime);
    }

    Ok(())
}

///////////////////////////
// Stack operations.
///////////////////////////

pub(crate) fn op_to_alt_stack(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let value = t.dstack.pop()?;
    t.astack.push(value);
    Ok(())
}

pub(crate) fn op_from_alt_stack(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let value = t
        .astack
        .pop()
        .map_err(|_| Error::InvalidAltStackOperation)?;
    t.dstack.push(value);
    Ok(())
}

pub(crate) fn op_2drop(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.drop(2)?)
}

pub(crate) fn op_2dup(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.dup(2)?)
}

pub(crate) fn op_3dup(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.dup(3)?)
}

pub(crate) fn op_2over(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.over(2)?)
}

pub(crate) fn op_2rot(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.rot(2)?)
}

pub(crate) fn op_2swap(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.swap(2)?)
}

pub(crate) fn op_ifdup(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let top = t.dstack.last()?;
    if cast_to_bool(top) {
        t.dstack.dup(1)?;
    }
    Ok(())
}

pub(crate) fn op_depth(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let depth = t.dstack.len();
    t.dstack.push_num(depth);
    Ok(())
}

pub(crate) fn op_drop(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.drop(1)?)
}

pub(crate) fn op_dup(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.dup(1)?)
}

pub(crate) fn op_nip(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.nip()?)
}

pub(crate) fn op_over(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.over(1)?)
}

/// Pops a stack index. Indices that do not fit in 64 bits are out of range
/// for any stack.
fn pop_index(t: &mut Thread<'_>) -> Result<i64> {
    let n = t.dstack.pop_num()?;
    Ok(n.to_i64().ok_or(StackError::InvalidOperation)?)
}

pub(crate) fn op_pick(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let n = pop_index(t)?;
    Ok(t.dstack.pick(n)?)
}

pub(crate) fn op_roll(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let n = pop_index(t)?;
    Ok(t.dstack.roll(n)?)
}

pub(crate) fn op_rot(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.rot(1)?)
}

pub(crate) fn op_swap(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.swap(1)?)
}

pub(crate) fn op_tuck(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    Ok(t.dstack.tuck()?)
}

///////////////////////////
// Splice operations.
///////////////////////////

pub(crate) fn op_cat(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let b = t.dstack.pop()?;
    let mut a = t.dstack.pop()?;

    let size = a.len() + b.len();
    if size > t.config.max_element_size {
        return Err(Error::ElementTooBig {
            size,
            max: t.config.max_element_size,
        });
    }

    a.extend_from_slice(&b);
    t.dstack.push(a);

    Ok(())
}

pub(crate) fn op_split(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let n = t.dstack.pop_num()?;
    let mut data = t.dstack.pop()?;

    if n.is_negative() {
        return Err(Error::NumberTooSmall("split index is negative"));
    }

    let n = n
        .to_i64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n <= data.len())
        .ok_or(Error::NumberTooBig("split index is larger than the array"))?;

    let right = data.split_off(n);
    t.dstack.push(data);
    t.dstack.push(right);

    Ok(())
}

pub(crate) fn op_num2bin(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let size = t.dstack.pop_num()?;
    let data = t.dstack.pop()?;

    if size.is_negative() {
        return Err(Error::NumberTooSmall("requested size is negative"));
    }

    let size = size
        .to_i64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n <= t.config.max_element_size)
        .ok_or(Error::NumberTooBig("requested size exceeds the max element size"))?;

    let mut num = minimally_encode(data);

    if num.len() > size {
        return Err(Error::NumberTooSmall("number cannot fit in the requested size"));
    }

    if num.len() < size {
        let sign_bit = match num.last_mut() {
            Some(last) => {
                let sign_bit = *last & 0x80;
                *last &= 0x7f;
                sign_bit
            }
            None => 0x00,
        };

        num.resize(size - 1, 0x00);
        num.push(sign_bit);
    }

    t.dstack.push(num);

    Ok(())
}

pub(crate) fn op_bin2num(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let data = t.dstack.pop()?;
    let num = minimally_encode(data);

    if num.len() > t.config.max_num_len {
        return Err(Error::NumberTooBig("number exceeds the max number length"));
    }

    t.dstack.push(num);

    Ok(())
}

pub(crate) fn op_size(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let size = t.dstack.last()?.len();
    t.dstack.push_num(size);
    Ok(())
}

///////////////////////////
// Bitwise logic.
///////////////////////////

pub(crate) fn op_invert(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let mut data = t.dstack.pop()?;
    data.iter_mut().for_each(|b| *b = !*b);
    t.dstack.push(data);
    Ok(())
}

fn eval_bitwise(op: &ParsedOpcode, t: &mut Thread<'_>, f: impl Fn(u8, u8) -> u8) -> Result {
    let b = t.dstack.pop()?;
    let mut a = t.dstack.pop()?;

    if a.len() != b.len() {
        return Err(Error::InvalidInputLength(op.name()));
    }

    a.iter_mut().zip(&b).for_each(|(x, y)| *x = f(*x, *y));
    t.dstack.push(a);

    Ok(())
}

pub(crate) fn op_and(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_bitwise(op, t, |a, b| a & b)
}

pub(crate) fn op_or(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_bitwise(op, t, |a, b| a | b)
}

pub(crate) fn op_xor(op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_bitwise(op, t, |a, b| a ^ b)
}

pub(crate) fn op_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let b = t.dstack.pop()?;
    let a = t.dstack.pop()?;
    t.dstack.push_bool(a == b);
    Ok(())
}

pub(crate) fn op_equal_verify(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let b = t.dstack.pop()?;
    let a = t.dstack.pop()?;
    if a != b {
        return Err(Error::EqualVerify);
    }
    Ok(())
}

/// Shifts a big-endian bit string to the left, the length is preserved.
fn shift_left(data: &[u8], n: usize) -> Vec<u8> {
    let len = data.len();
    let byte_shift = n / 8;
    let bit_shift = (n % 8) as u32;
    let mut result = vec![0u8; len];

    for (i, byte) in result.iter_mut().enumerate() {
        let Some(src) = i.checked_add(byte_shift).filter(|src| *src < len) else {
            break;
        };
        *byte = data[src] << bit_shift;
        if bit_shift > 0 && src + 1 < len {
            *byte |= data[src + 1] >> (8 - bit_shift);
        }
    }

    result
}

/// Shifts a big-endian bit string to the right, the length is preserved.
fn shift_right(data: &[u8], n: usize) -> Vec<u8> {
    let len = data.len();
    let byte_shift = n / 8;
    let bit_shift = (n % 8) as u32;
    let mut result = vec![0u8; len];

    for (i, byte) in result.iter_mut().enumerate().skip(byte_shift) {
        let src = i - byte_shift;
        *byte = data[src] >> bit_shift;
        if bit_shift > 0 && src > 0 {
            *byte |= data[src - 1] << (8 - bit_shift);
        }
    }

    result
}

fn eval_shift(t: &mut Thread<'_>, shift: fn(&[u8], usize) -> Vec<u8>) -> Result {
    let n = t.dstack.pop_num()?;
    let data = t.dstack.pop()?;

    if n.is_negative() {
        return Err(Error::NumberTooSmall("shift amount is negative"));
    }

    // Shifting by more bits than the value holds clears it.
    let n = n
        .to_i64()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(usize::MAX);

    t.dstack.push(shift(&data, n));

    Ok(())
}

pub(crate) fn op_lshift(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_shift(t, shift_left)
}

pub(crate) fn op_rshift(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_shift(t, shift_right)
}

///////////////////////////
// Arithmetic.
///////////////////////////

fn eval_unary(t: &mut Thread<'_>, f: impl FnOnce(ScriptNum) -> ScriptNum) -> Result {
    let n = t.dstack.pop_num()?;
    t.dstack.push_num(f(n));
    Ok(())
}

fn eval_binary(
    t: &mut Thread<'_>,
    f: impl FnOnce(ScriptNum, ScriptNum) -> Result<ScriptNum>,
) -> Result {
    let b = t.dstack.pop_num()?;
    let a = t.dstack.pop_num()?;
    let result = f(a, b)?;
    t.dstack.push_num(result);
    Ok(())
}

fn eval_compare(t: &mut Thread<'_>, f: impl FnOnce(&ScriptNum, &ScriptNum) -> bool) -> Result {
    let b = t.dstack.pop_num()?;
    let a = t.dstack.pop_num()?;
    t.dstack.push_bool(f(&a, &b));
    Ok(())
}

pub(crate) fn op_1add(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_unary(t, |n| n + ScriptNum::from(1))
}

pub(crate) fn op_1sub(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_unary(t, |n| n - ScriptNum::from(1))
}

pub(crate) fn op_negate(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_unary(t, |n| -n)
}

pub(crate) fn op_abs(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_unary(t, |n| n.abs())
}

pub(crate) fn op_not(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let n = t.dstack.pop_num()?;
    t.dstack.push_bool(n.is_zero());
    Ok(())
}

pub(crate) fn op_0_not_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let n = t.dstack.pop_num()?;
    t.dstack.push_bool(!n.is_zero());
    Ok(())
}

pub(crate) fn op_add(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a + b))
}

pub(crate) fn op_sub(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a - b))
}

pub(crate) fn op_mul(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a * b))
}

pub(crate) fn op_div(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a.checked_div(&b)?))
}

pub(crate) fn op_mod(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a.checked_rem(&b)?))
}

pub(crate) fn op_bool_and(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| !a.is_zero() && !b.is_zero())
}

pub(crate) fn op_bool_or(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| !a.is_zero() || !b.is_zero())
}

pub(crate) fn op_num_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a == b)
}

pub(crate) fn op_num_equal_verify(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let b = t.dstack.pop_num()?;
    let a = t.dstack.pop_num()?;
    if a != b {
        return Err(Error::NumEqualVerify);
    }
    Ok(())
}

pub(crate) fn op_num_not_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a != b)
}

pub(crate) fn op_less_than(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a < b)
}

pub(crate) fn op_greater_than(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a > b)
}

pub(crate) fn op_less_than_or_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a <= b)
}

pub(crate) fn op_greater_than_or_equal(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_compare(t, |a, b| a >= b)
}

pub(crate) fn op_min(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a.min(b)))
}

pub(crate) fn op_max(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_binary(t, |a, b| Ok(a.max(b)))
}

/// [x min max -- x >= min && x < max]
pub(crate) fn op_within(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    let max = t.dstack.pop_num()?;
    let min = t.dstack.pop_num()?;
    let x = t.dstack.pop_num()?;
    t.dstack.push_bool(min <= x && x < max);
    Ok(())
}

///////////////////////////
// Crypto.
///////////////////////////

fn eval_hash(t: &mut Thread<'_>, hash: impl FnOnce(&[u8]) -> Vec<u8>) -> Result {
    let data = t.dstack.pop()?;
    t.dstack.push(hash(&data));
    Ok(())
}

pub(crate) fn op_ripemd160(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_hash(t, |data| ripemd160::Hash::hash(data).to_byte_array().to_vec())
}

pub(crate) fn op_sha1(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_hash(t, |data| sha1::Hash::hash(data).to_byte_array().to_vec())
}

pub(crate) fn op_sha256(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_hash(t, |data| sha256::Hash::hash(data).to_byte_array().to_vec())
}

pub(crate) fn op_hash160(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_hash(t, |data| hash160::Hash::hash(data).to_byte_array().to_vec())
}

pub(crate) fn op_hash256(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    eval_hash(t, |data| sha256d::Hash::hash(data).to_byte_array().to_vec())
}

pub(crate) fn op_code_separator(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result {
    t.begin_code = t.script_off() + 1;
    Ok(())
}
