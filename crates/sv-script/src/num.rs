//! Script numeric

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use std::ops::{Add, Mul, Neg, Sub};

/// Script number error type.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum NumError {
    #[error("script number overflow")]
    Overflow,
    #[error("non-minimally encoded script number")]
    NotMinimallyEncoded,
    #[error("division by zero")]
    DivideByZero,
}

/// A numeric type used in Bitcoin Script operations.
///
/// Values are arbitrary precision. Every arithmetic operation produces a new
/// number, a [`ScriptNum`] is never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptNum {
    value: BigInt,
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ScriptNum {
                fn from(value: $t) -> Self {
                    Self {
                        value: BigInt::from(value),
                    }
                }
            }
        )*
    };
}

impl_from_primitive!(i32, i64, u8, u32, u64, usize);

impl From<BigInt> for ScriptNum {
    fn from(value: BigInt) -> Self {
        Self { value }
    }
}

impl std::fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl ScriptNum {
    /// Maximum script number length in bytes before genesis.
    pub const MAX_NUM_SIZE: usize = 4;

    /// Construct a [`ScriptNum`] with size validation.
    ///
    /// `max_size` defaults to [`Self::MAX_NUM_SIZE`].
    pub fn from_bytes(
        data: &[u8],
        require_minimal: bool,
        max_size: Option<usize>,
    ) -> Result<Self, NumError> {
        let max_size = max_size.unwrap_or(Self::MAX_NUM_SIZE);

        if data.len() > max_size {
            return Err(NumError::Overflow);
        }

        if require_minimal && !is_minimally_encoded(data) {
            return Err(NumError::NotMinimallyEncoded);
        }

        let Some((&last, _)) = data.split_last() else {
            return Ok(Self::default());
        };

        // Clear the sign bit and interpret the rest as a little-endian magnitude.
        let mut magnitude = data.to_vec();
        let len = magnitude.len();
        magnitude[len - 1] &= 0x7f;

        let sign = if last & 0x80 != 0 {
            Sign::Minus
        } else {
            Sign::Plus
        };

        Ok(Self {
            value: BigInt::from_bytes_le(sign, &magnitude),
        })
    }

    /// Convert the number to a minimally encoded byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.value.is_zero() {
            return Vec::new();
        }

        let (sign, mut result) = self.value.to_bytes_le();
        let negative = sign == Sign::Minus;

        // Handle sign bit
        let last = result[result.len() - 1];
        if last & 0x80 != 0 {
            result.push(if negative { 0x80 } else { 0 });
        } else if negative {
            let len = result.len();
            result[len - 1] |= 0x80;
        }

        result
    }

    /// Returns the number clamped to the signed 32-bit range.
    pub fn clamp_i32(&self) -> Self {
        if self.value > BigInt::from(i32::MAX) {
            Self::from(i32::MAX)
        } else if self.value < BigInt::from(i32::MIN) {
            Self::from(i32::MIN)
        } else {
            self.clone()
        }
    }

    /// Returns the value as `i32`, saturating at the type bounds.
    pub fn to_i32(&self) -> i32 {
        self.value.to_i32().unwrap_or(if self.is_negative() {
            i32::MIN
        } else {
            i32::MAX
        })
    }

    /// Returns the value as `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }

    /// Get the underlying value.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    pub fn abs(&self) -> Self {
        self.value.abs().into()
    }

    /// Truncating division, `a / 0` fails.
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumError> {
        if other.is_zero() {
            return Err(NumError::DivideByZero);
        }
        Ok((&self.value / &other.value).into())
    }

    /// Remainder with the sign of the dividend, `a % 0` fails.
    pub fn checked_rem(&self, other: &Self) -> Result<Self, NumError> {
        if other.is_zero() {
            return Err(NumError::DivideByZero);
        }
        Ok((&self.value % &other.value).into())
    }
}

/// Check if the byte array is minimally encoded.
pub(crate) fn is_minimally_encoded(data: &[u8]) -> bool {
    let Some((&last, rest)) = data.split_last() else {
        return true;
    };

    // The most significant byte may only be zero (ignoring the sign bit) when
    // the byte before it has its high bit set.
    if last & 0x7f == 0 {
        match rest.last() {
            Some(&prev) if prev & 0x80 != 0 => {}
            _ => return false,
        }
    }

    true
}

/// Strips superfluous trailing bytes from a sign-magnitude encoded number.
pub(crate) fn minimally_encode(mut data: Vec<u8>) -> Vec<u8> {
    let Some(&last) = data.last() else {
        return data;
    };

    if last & 0x7f != 0 {
        return data;
    }

    if data.len() == 1 {
        return Vec::new();
    }

    if data[data.len() - 2] & 0x80 != 0 {
        return data;
    }

    for i in (1..data.len()).rev() {
        if data[i - 1] != 0 {
            if data[i - 1] & 0x80 != 0 {
                data[i] = last;
                data.truncate(i + 1);
            } else {
                data[i - 1] |= last;
                data.truncate(i);
            }
            return data;
        }
    }

    Vec::new()
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl $trait<&ScriptNum> for &ScriptNum {
            type Output = ScriptNum;

            fn $method(self, other: &ScriptNum) -> ScriptNum {
                ScriptNum {
                    value: (&self.value).$method(&other.value),
                }
            }
        }

        impl $trait for ScriptNum {
            type Output = ScriptNum;

            fn $method(self, other: ScriptNum) -> ScriptNum {
                (&self).$method(&other)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);

impl Neg for &ScriptNum {
    type Output = ScriptNum;

    fn neg(self) -> ScriptNum {
        ScriptNum {
            value: -&self.value,
        }
    }
}

impl Neg for ScriptNum {
    type Output = ScriptNum;

    fn neg(self) -> ScriptNum {
        ScriptNum { value: -self.value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_num_arithmetic() {
        let a = ScriptNum::from(5);
        let b = ScriptNum::from(3);

        assert_eq!(&a + &b, ScriptNum::from(8));
        assert_eq!(&a - &b, ScriptNum::from(2));
        assert_eq!(&a * &b, ScriptNum::from(15));
        assert_eq!(-a.clone(), ScriptNum::from(-5));
        assert_eq!(a.checked_div(&b), Ok(ScriptNum::from(1)));
        assert_eq!(a.checked_rem(&b), Ok(ScriptNum::from(2)));
        assert_eq!(
            ScriptNum::from(-7).checked_div(&ScriptNum::from(2)),
            Ok(ScriptNum::from(-3))
        );
        assert_eq!(
            ScriptNum::from(-7).checked_rem(&ScriptNum::from(2)),
            Ok(ScriptNum::from(-1))
        );
        assert_eq!(
            a.checked_div(&ScriptNum::default()),
            Err(NumError::DivideByZero)
        );
        assert_eq!(
            a.checked_rem(&ScriptNum::default()),
            Err(NumError::DivideByZero)
        );
    }

    #[test]
    fn test_arithmetic_does_not_overflow() {
        let max = ScriptNum::from(i64::MAX);
        let sum = &max + &max;
        assert_eq!(sum.to_i64(), None);
        assert_eq!(sum.to_bytes(), hex::decode("feffffffffffffff00").unwrap());
        assert_eq!(sum.clamp_i32(), ScriptNum::from(i32::MAX));
        assert_eq!((-sum).clamp_i32(), ScriptNum::from(i32::MIN));
        assert_eq!(ScriptNum::from(-42).clamp_i32(), ScriptNum::from(-42));
    }

    #[test]
    fn test_to_i32_saturates() {
        assert_eq!(ScriptNum::from(7).to_i32(), 7);
        assert_eq!(ScriptNum::from(i64::MAX).to_i32(), i32::MAX);
        assert_eq!(ScriptNum::from(i64::MIN).to_i32(), i32::MIN);
    }

    // Helper function to convert hex string to bytes
    fn hex_to_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).expect("Invalid hex")
    }

    // Test for converting script numbers to byte representations
    #[test]
    fn test_script_num_to_bytes() {
        let tests = vec![
            (0i64, vec![]),
            (1, hex_to_bytes("01")),
            (-1, hex_to_bytes("81")),
            (127, hex_to_bytes("7f")),
            (-127, hex_to_bytes("ff")),
            (128, hex_to_bytes("8000")),
            (-128, hex_to_bytes("8080")),
            (129, hex_to_bytes("8100")),
            (-129, hex_to_bytes("8180")),
            (256, hex_to_bytes("0001")),
            (-256, hex_to_bytes("0081")),
            (32767, hex_to_bytes("ff7f")),
            (-32767, hex_to_bytes("ffff")),
            (32768, hex_to_bytes("008000")),
            (-32768, hex_to_bytes("008080")),
            (65535, hex_to_bytes("ffff00")),
            (-65535, hex_to_bytes("ffff80")),
            (524288, hex_to_bytes("000008")),
            (-524288, hex_to_bytes("000088")),
            (7340032, hex_to_bytes("000070")),
            (-7340032, hex_to_bytes("0000f0")),
            (8388608, hex_to_bytes("00008000")),
            (-8388608, hex_to_bytes("00008080")),
            (2147483647, hex_to_bytes("ffffff7f")),
            (-2147483647, hex_to_bytes("ffffffff")),
            (2147483648, hex_to_bytes("0000008000")),
            (-2147483648, hex_to_bytes("0000008080")),
            (2415919104, hex_to_bytes("0000009000")),
            (-2415919104, hex_to_bytes("0000009080")),
            (4294967295, hex_to_bytes("ffffffff00")),
            (-4294967295, hex_to_bytes("ffffffff80")),
            (4294967296, hex_to_bytes("0000000001")),
            (-4294967296, hex_to_bytes("0000000081")),
            (281474976710655, hex_to_bytes("ffffffffffff00")),
            (-281474976710655, hex_to_bytes("ffffffffffff80")),
            (72057594037927935, hex_to_bytes("ffffffffffffff00")),
            (-72057594037927935, hex_to_bytes("ffffffffffffff80")),
            (9223372036854775807, hex_to_bytes("ffffffffffffff7f")),
            (-9223372036854775807, hex_to_bytes("ffffffffffffffff")),
        ];

        for (num, expected) in tests {
            let got_bytes = ScriptNum::from(num).to_bytes();
            assert_eq!(
                got_bytes, expected,
                "Did not get expected bytes for {num}, got {got_bytes:?}, want {expected:?}",
            );
            // Every canonical encoding decodes back to the same value.
            let decoded = ScriptNum::from_bytes(&got_bytes, true, Some(8)).unwrap();
            assert_eq!(decoded, ScriptNum::from(num));
        }
    }

    // Test for converting byte representations to script numbers
    //
    // Copied from https://github.com/btcsuite/btcd/blob/ff2e03e11233fa25c01cf4acbf76501fc008b31f/txscript/scriptnum_test.go#L27
    #[test]
    fn test_script_num_from_bytes() {
        let big = |s: &str| s.parse::<BigInt>().unwrap();

        let tests = vec![
            ("80", Err(NumError::NotMinimallyEncoded), true, None),
            // Empty bytes.
            ("", Ok(big("0")), true, None),
            ("01", Ok(big("1")), true, None),
            ("81", Ok(big("-1")), true, None),
            ("7f", Ok(big("127")), true, None),
            ("ff", Ok(big("-127")), true, None),
            ("8000", Ok(big("128")), true, None),
            ("8080", Ok(big("-128")), true, None),
            ("8100", Ok(big("129")), true, None),
            ("8180", Ok(big("-129")), true, None),
            ("0001", Ok(big("256")), true, None),
            ("0081", Ok(big("-256")), true, None),
            ("ff7f", Ok(big("32767")), true, None),
            ("ffff", Ok(big("-32767")), true, None),
            ("008000", Ok(big("32768")), true, None),
            ("008080", Ok(big("-32768")), true, None),
            ("ffff00", Ok(big("65535")), true, None),
            ("ffff80", Ok(big("-65535")), true, None),
            ("000008", Ok(big("524288")), true, None),
            ("000088", Ok(big("-524288")), true, None),
            ("000070", Ok(big("7340032")), true, None),
            ("0000f0", Ok(big("-7340032")), true, None),
            ("00008000", Ok(big("8388608")), true, None),
            ("00008080", Ok(big("-8388608")), true, None),
            ("ffffff7f", Ok(big("2147483647")), true, None),
            ("ffffffff", Ok(big("-2147483647")), true, None),
            ("ffffffff7f", Ok(big("549755813887")), true, Some(5)),
            ("ffffffffff", Ok(big("-549755813887")), true, Some(5)),
            ("ffffffffffffff7f", Ok(big("9223372036854775807")), true, Some(8)),
            ("ffffffffffffffff", Ok(big("-9223372036854775807")), true, Some(8)),
            // Beyond 64 bits.
            ("ffffffffffffffff7f", Ok(big("2361183241434822606847")), true, Some(9)),
            ("ffffffffffffffffff", Ok(big("-2361183241434822606847")), true, Some(9)),
            ("ffffffffffffffffff7f", Ok(big("604462909807314587353087")), true, Some(10)),
            ("ffffffffffffffffffff", Ok(big("-604462909807314587353087")), true, Some(10)),
            ("0000008000", Err(NumError::Overflow), true, None),
            ("0000008080", Err(NumError::Overflow), true, None),
            ("0000009000", Err(NumError::Overflow), true, None),
            ("0000009080", Err(NumError::Overflow), true, None),
            ("ffffffff00", Err(NumError::Overflow), true, None),
            ("ffffffff80", Err(NumError::Overflow), true, None),
            ("0000000001", Err(NumError::Overflow), true, None),
            ("0000000081", Err(NumError::Overflow), true, None),
            ("ffffffffffff00", Err(NumError::Overflow), true, None),
            ("ffffffffffff80", Err(NumError::Overflow), true, None),
            ("ffffffffffffff00", Err(NumError::Overflow), true, None),
            ("ffffffffffffff80", Err(NumError::Overflow), true, None),
            ("ffffffffffffff7f", Err(NumError::Overflow), true, None),
            ("ffffffffffffffff", Err(NumError::Overflow), true, None),
            ("00", Err(NumError::NotMinimallyEncoded), true, None),
            ("0100", Err(NumError::NotMinimallyEncoded), true, None),
            ("7f00", Err(NumError::NotMinimallyEncoded), true, None),
            ("800000", Err(NumError::NotMinimallyEncoded), true, None),
            ("810000", Err(NumError::NotMinimallyEncoded), true, None),
            ("000100", Err(NumError::NotMinimallyEncoded), true, None),
            ("ff7f00", Err(NumError::NotMinimallyEncoded), true, None),
            ("00800000", Err(NumError::NotMinimallyEncoded), true, None),
            ("ffff0000", Err(NumError::NotMinimallyEncoded), true, None),
            ("00000800", Err(NumError::NotMinimallyEncoded), true, None),
            ("00007000", Err(NumError::NotMinimallyEncoded), true, None),
            (
                "0009000100",
                Err(NumError::NotMinimallyEncoded),
                true,
                Some(5),
            ),
            ("00", Ok(big("0")), false, None),
            ("0100", Ok(big("1")), false, None),
            ("7f00", Ok(big("127")), false, None),
            ("800000", Ok(big("128")), false, None),
            ("810000", Ok(big("129")), false, None),
            ("000100", Ok(big("256")), false, None),
            ("ff7f00", Ok(big("32767")), false, None),
            ("00800000", Ok(big("32768")), false, None),
            ("ffff0000", Ok(big("65535")), false, None),
            ("00000800", Ok(big("524288")), false, None),
            ("00007000", Ok(big("7340032")), false, None),
            ("0009000100", Ok(big("16779520")), false, Some(5)),
            // Negative zero decodes to zero when minimality is not enforced.
            ("80", Ok(big("0")), false, None),
        ];

        for (serialized_in_hex, expected_result, minimal_encoding, max_size) in tests {
            let serialized = hex_to_bytes(serialized_in_hex);
            let result = ScriptNum::from_bytes(&serialized, minimal_encoding, max_size)
                .map(|num| num.value().clone());
            assert_eq!(
                result, expected_result,
                "Failed to convert bytes {serialized_in_hex} to ScriptNum, \
                got: {result:?}, expected {expected_result:?}"
            );
        }
    }

    #[test]
    fn test_minimally_encode() {
        let tests = [
            ("", ""),
            ("00", ""),
            ("80", ""),
            ("0000", ""),
            ("0080", ""),
            ("01", "01"),
            ("0100", "01"),
            ("010080", "81"),
            ("ff00", "ff00"),
            ("ff0000", "ff00"),
            ("ff0080", "ff80"),
            ("abcdef4280", "abcdefc2"),
        ];

        for (input, expected) in tests {
            let got = minimally_encode(hex_to_bytes(input));
            assert_eq!(hex::encode(&got), expected, "minimally_encode({input})");
            assert!(is_minimally_encoded(&got));
        }
    }
}
