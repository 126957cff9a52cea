use num_traits::Num;
use std::sync::LazyLock;

// pub constant for compressed public key size
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;

pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// Maximum size of the numeric operand of CHECKLOCKTIMEVERIFY and
/// CHECKSEQUENCEVERIFY.
pub const LOCKTIME_NUM_SIZE: usize = 5;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_FORKID: u32 = 0x40;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Mask selecting the base type (ALL, NONE, SINGLE) of a sighash type.
pub const SIGHASH_BASE_MASK: u32 = 0x1f;

/// Threshold for nLockTime: below this value it is interpreted as block number,
/// otherwise as UNIX timestamp.
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Setting nSequence to this value for every input in a transaction disables
/// nLockTime.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Below flags apply in the context of BIP 68
/// If this flag set, CTxIn::nSequence is NOT interpreted as a relative lock-time.
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: u32 = 1u32 << 31;

/// If CTxIn::nSequence encodes a relative lock-time and this flag is set, the
/// relative lock-time has units of 512 seconds, otherwise it specifies blocks.
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: u32 = 1 << 22;

/// If CTxIn::nSequence encodes a relative lock-time, this mask is applied to
/// extract that lock-time from the sequence field.
pub const SEQUENCE_LOCKTIME_MASK: u32 = 0x0000_ffff;

pub static HALF_ORDER: LazyLock<num_bigint::BigInt> = LazyLock::new(|| {
    const N: &str = "7fffffffffffffffffffffffffffffff5d576e7357a4501ddfe92f46681b20a0";
    num_bigint::BigInt::from_str_radix(N, 16).expect("Static value must be valid")
});
