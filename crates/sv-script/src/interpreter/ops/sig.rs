use crate::constants::{
    COMPRESSED_PUBKEY_SIZE, HALF_ORDER, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_FORKID,
    SIGHASH_SINGLE, UNCOMPRESSED_PUBKEY_SIZE,
};
use crate::error::Error;
use crate::interpreter::Thread;
use crate::parser::ParsedOpcode;
use crate::VerifyFlags;
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::PublicKey;
use num_bigint::Sign;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureEncodingError {
    #[error("malformed signature: too short")]
    TooShort,
    #[error("malformed signature: too long")]
    TooLong,
    #[error("malformed signature: format has wrong type")]
    InvalidSequenceId,
    #[error("malformed signature: bad length")]
    InvalidDataLength,
    #[error("malformed signature: S type indicator missing")]
    MissingTypeIdS,
    #[error("malformed signature: S length missing")]
    MissingLengthS,
    #[error("malformed signature: invalid S length")]
    InvalidLengthS,
    #[error("malformed signature: R integer marker")]
    InvalidIntegerIdR,
    #[error("malformed signature: R length is zero")]
    ZeroLengthR,
    #[error("malformed signature: R is negative")]
    NegativeR,
    #[error("malformed signature: R value has too much padding")]
    TooMuchPaddingR,
    #[error("malformed signature: S integer marker")]
    InvalidIntegerIdS,
    #[error("malformed signature: S length is zero")]
    ZeroLengthS,
    #[error("malformed signature: S is negative")]
    NegativeS,
    #[error("malformed signature: S value has too much padding")]
    TooMuchPaddingS,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckSigError {
    #[error("invalid signature encoding: {0}")]
    Der(#[from] SignatureEncodingError),
    #[error("signature is not canonical due to unnecessarily high S value")]
    HighS,
    #[error("unsupported public key type")]
    PubKeyType,
    #[error("invalid hash type 0x{0:x}")]
    InvalidSigHashType(u32),
    #[error("signature uses SIGHASH_FORKID without the forkid flag")]
    IllegalForkId,
    #[error("signature must use SIGHASH_FORKID")]
    MustUseForkId,
    /// Signatures are not empty on failed checksig or checkmultisig
    /// operations.
    #[error("signature not empty on failed checksig")]
    NullFail,
}

pub(crate) fn op_checksig(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result<(), Error> {
    let success = eval_checksig(t)?;
    t.dstack.push_bool(success);
    Ok(())
}

pub(crate) fn op_checksig_verify(_op: &ParsedOpcode, t: &mut Thread<'_>) -> Result<(), Error> {
    if !eval_checksig(t)? {
        return Err(Error::CheckSigVerify);
    }
    Ok(())
}

fn eval_checksig(t: &mut Thread<'_>) -> Result<bool, Error> {
    let pubkey = t.dstack.pop()?;
    let sig = t.dstack.pop()?;

    let mut sub_script = t.sub_script();

    // A legacy signature can't sign itself.
    if !uses_fork_id(&sig, t.flags) {
        sub_script = sub_script.legacy_subscript([sig.as_slice()]);
    }

    let script_code = sub_script.unparse()?;

    let success = verify_signature(t, &sig, &pubkey, &script_code)?;

    if !success && t.flags.verify_nullfail() && !sig.is_empty() {
        return Err(CheckSigError::NullFail.into());
    }

    Ok(success)
}

/// Whether the signature commits to the forkid digest, in which case the
/// script code is hashed untouched.
pub(super) fn uses_fork_id(sig: &[u8], flags: VerifyFlags) -> bool {
    flags.verify_sighash_forkid()
        && sig
            .last()
            .is_some_and(|hash_type| u32::from(*hash_type) & SIGHASH_FORKID != 0)
}

/// Verifies a signature, hash type byte included, against a public key.
///
/// An empty signature is a valid way to fail a check and yields `false`
/// before the public key is inspected. Encoding violations of the enabled
/// rules are errors, keys and signatures secp256k1 can't parse only fail the
/// check.
pub(super) fn verify_signature(
    t: &Thread<'_>,
    full_sig: &[u8],
    pubkey: &[u8],
    script_code: &[u8],
) -> Result<bool, Error> {
    let Some((&hash_type, sig)) = full_sig.split_last() else {
        return Ok(false);
    };

    check_signature_encoding(full_sig, t.flags)?;
    check_pubkey_encoding(pubkey, t.flags)?;

    let Ok(pubkey) = PublicKey::from_slice(pubkey) else {
        return Ok(false);
    };

    let signature = if t.flags.requires_strict_der() {
        Signature::from_der(sig)
    } else {
        Signature::from_der_lax(sig)
    };

    let Ok(signature) = signature else {
        return Ok(false);
    };

    t.checker
        .check_sig(&signature, &pubkey, script_code, u32::from(hash_type), t.flags)
}

/// Checks a signature with its trailing hash type byte against the encoding
/// rules enabled by `flags`.
pub(super) fn check_signature_encoding(
    full_sig: &[u8],
    flags: VerifyFlags,
) -> Result<(), CheckSigError> {
    // Empty signature. Not strictly DER encoded, but allowed to provide a
    // compact way to provide an invalid signature for use with CHECK(MULTI)SIG
    let Some((&hash_type, sig)) = full_sig.split_last() else {
        return Ok(());
    };

    if flags.verify_strictenc() {
        check_hash_type_encoding(u32::from(hash_type), flags)?;
    }

    if flags.requires_strict_der() {
        let encoded_s = is_valid_signature_encoding(sig)?;

        if flags.verify_low_s() {
            is_low_s(&sig[encoded_s.offset..encoded_s.offset + encoded_s.length])?;
        }
    }

    Ok(())
}

fn check_hash_type_encoding(hash_type: u32, flags: VerifyFlags) -> Result<(), CheckSigError> {
    let base = hash_type & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID);

    if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
        return Err(CheckSigError::InvalidSigHashType(hash_type));
    }

    let has_fork_id = hash_type & SIGHASH_FORKID != 0;

    match (flags.verify_sighash_forkid(), has_fork_id) {
        (false, true) => Err(CheckSigError::IllegalForkId),
        (true, false) => Err(CheckSigError::MustUseForkId),
        _ => Ok(()),
    }
}

struct EncodedS {
    /// S offset
    offset: usize,
    /// S length.
    length: usize,
}

// The canonical DER format, without the hash type byte:
// 0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S]
fn is_valid_signature_encoding(sig: &[u8]) -> Result<EncodedS, SignatureEncodingError> {
    const MIN_LEN: usize = 8;
    const MAX_LEN: usize = 72;
    const SEQUENCE_OFFSET: usize = 0;
    const DATA_LEN_OFFSET: usize = 1;
    const R_TYPE_OFFSET: usize = 2;
    const R_LEN_OFFSET: usize = 3;
    const R_OFFSET: usize = 4;
    const ASN1_SEQUENCE_ID: u8 = 0x30;
    const ASN1_INTEGER_ID: u8 = 0x02;

    if sig.len() < MIN_LEN {
        return Err(SignatureEncodingError::TooShort);
    }

    if sig.len() > MAX_LEN {
        return Err(SignatureEncodingError::TooLong);
    }

    if sig[SEQUENCE_OFFSET] != ASN1_SEQUENCE_ID {
        return Err(SignatureEncodingError::InvalidSequenceId);
    }

    // Make sure the length covers the entire signature
    if usize::from(sig[DATA_LEN_OFFSET]) != sig.len() - 2 {
        return Err(SignatureEncodingError::InvalidDataLength);
    }

    let len_r = usize::from(sig[R_LEN_OFFSET]);
    let s_type_offset = R_OFFSET + len_r;
    let s_len_offset = s_type_offset + 1;

    if s_type_offset >= sig.len() {
        return Err(SignatureEncodingError::MissingTypeIdS);
    }

    if s_len_offset >= sig.len() {
        return Err(SignatureEncodingError::MissingLengthS);
    }

    let len_s = usize::from(sig[s_len_offset]);
    let s_offset = s_len_offset + 1;

    if s_offset + len_s != sig.len() {
        return Err(SignatureEncodingError::InvalidLengthS);
    }

    if sig[R_TYPE_OFFSET] != ASN1_INTEGER_ID {
        return Err(SignatureEncodingError::InvalidIntegerIdR);
    }

    if len_r == 0 {
        return Err(SignatureEncodingError::ZeroLengthR);
    }

    if sig[R_OFFSET] & 0x80 != 0 {
        return Err(SignatureEncodingError::NegativeR);
    }

    // Null bytes at the start of R are not allowed, unless R would otherwise
    // be interpreted as a negative number.
    if len_r > 1 && sig[R_OFFSET] == 0x00 && sig[R_OFFSET + 1] & 0x80 == 0 {
        return Err(SignatureEncodingError::TooMuchPaddingR);
    }

    if sig[s_type_offset] != ASN1_INTEGER_ID {
        return Err(SignatureEncodingError::InvalidIntegerIdS);
    }

    if len_s == 0 {
        return Err(SignatureEncodingError::ZeroLengthS);
    }

    if sig[s_offset] & 0x80 != 0 {
        return Err(SignatureEncodingError::NegativeS);
    }

    if len_s > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return Err(SignatureEncodingError::TooMuchPaddingS);
    }

    Ok(EncodedS {
        offset: s_offset,
        length: len_s,
    })
}

fn is_low_s(s_bytes: &[u8]) -> Result<(), CheckSigError> {
    // The complement of a high S modulo the curve order is an equally valid
    // signature, accepting both makes transactions malleable.
    let s_value = num_bigint::BigInt::from_bytes_be(Sign::Plus, s_bytes);

    if s_value > *HALF_ORDER {
        return Err(CheckSigError::HighS);
    }

    Ok(())
}

// Checks whether or not the passed public key adheres to
// the strict encoding requirements if enabled.
pub(super) fn check_pubkey_encoding(pubkey: &[u8], flags: VerifyFlags) -> Result<(), CheckSigError> {
    if flags.verify_strictenc() && !is_public_key(pubkey) {
        return Err(CheckSigError::PubKeyType);
    }

    Ok(())
}

fn is_public_key(v: &[u8]) -> bool {
    match v.len() {
        COMPRESSED_PUBKEY_SIZE => matches!(v[0], 0x02 | 0x03),
        UNCOMPRESSED_PUBKEY_SIZE => v[0] == 0x04,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_public_key() {
        assert!(!is_public_key(&[]));
        assert!(!is_public_key(&[1]));
        assert!(is_public_key(&hex::decode("0495dfb90f202c7d016ef42c65bc010cd26bb8237b06253cc4d12175097bef767ed6b1fcb3caf1ed57c98d92e6cb70278721b952e29a335134857acd4c199b9d2f").unwrap()));
        assert!(is_public_key(&[2; 33]));
        assert!(is_public_key(&[3; 33]));
        assert!(!is_public_key(&[4; 33]));
    }

    // https://github.com/btcsuite/btcd/blob/ff2e03e11233fa25c01cf4acbf76501fc008b31f/txscript/engine_test.go#L201
    #[test]
    fn test_check_pubkey_encoding() {
        let tests = [
            // uncompressed ok
            (
                [
                    "0411db93e1dcdb8a016b49840f8c53bc1eb68",
                    "a382e97b1482ecad7b148a6909a5cb2e0eaddfb84ccf",
                    "9744464f82e160bfa9b8b64f9d4c03f999b8643f656b",
                    "412a3",
                ]
                .concat(),
                Ok(()),
            ),
            // compressed ok
            (
                [
                    "02ce0b14fb842b1ba549fdd675c98075f12e9",
                    "c510f8ef52bd021a9a1f4809d3b4d",
                ]
                .concat(),
                Ok(()),
            ),
            // compressed ok
            (
                [
                    "032689c7c2dab13309fb143e0e8fe39634252",
                    "1887e976690b6b47f5b2a4b7d448e",
                ]
                .concat(),
                Ok(()),
            ),
            // empty
            ("".to_string(), Err(CheckSigError::PubKeyType)),
            // hybrid
            (
                [
                    "0679be667ef9dcbbac55a06295ce870b07029",
                    "bfcdb2dce28d959f2815b16f81798483ada7726a3c46",
                    "55da4fbfc0e1108a8fd17b448a68554199c47d08ffb1",
                    "0d4b8",
                ]
                .concat(),
                Err(CheckSigError::PubKeyType),
            ),
        ];

        for (hex_str, expected_result) in tests {
            let key = hex::decode(hex_str).expect("Invalid hex string");
            assert_eq!(
                check_pubkey_encoding(&key, VerifyFlags::STRICTENC),
                expected_result
            );
            // Without strict encoding anything goes.
            assert_eq!(check_pubkey_encoding(&key, VerifyFlags::NONE), Ok(()));
        }
    }

    // https://github.com/btcsuite/btcd/blob/ff2e03e11233fa25c01cf4acbf76501fc008b31f/txscript/engine_test.go#L261
    #[test]
    fn test_signature_encoding() {
        use SignatureEncodingError::*;

        let test_cases = [
            (
                "valid signature",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                None,
            ),
            (
                "bad magic",
                [
                    "314402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidSequenceId),
            ),
            (
                "bad 1st int marker magic",
                [
                    "304403204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidIntegerIdR),
            ),
            (
                "bad 2nd int marker",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41032018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidIntegerIdS),
            ),
            (
                "short len",
                [
                    "304302204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidDataLength),
            ),
            (
                "long len",
                [
                    "304502204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidDataLength),
            ),
            (
                "long X",
                [
                    "304402424e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(MissingTypeIdS),
            ),
            (
                "long Y",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022118152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidLengthS),
            ),
            (
                "short Y",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41021918152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(InvalidLengthS),
            ),
            (
                "trailing crap",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d0901",
                ]
                .concat(),
                Some(InvalidDataLength),
            ),
            (
                "X == N",
                [
                    "30440220fffffffffffffffffffffffffffff",
                    "ffebaaedce6af48a03bbfd25e8cd0364141022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(NegativeR),
            ),
            (
                "X > N",
                [
                    "30440220fffffffffffffffffffffffffffff",
                    "ffebaaedce6af48a03bbfd25e8cd0364142022018152",
                    "2ec8eca07de4860a4acdd12909d831cc56cbbac46220",
                    "82221a8768d1d09",
                ]
                .concat(),
                Some(NegativeR),
            ),
            (
                "Y == N",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd410220fffff",
                    "ffffffffffffffffffffffffffebaaedce6af48a03bb",
                    "fd25e8cd0364141",
                ]
                .concat(),
                Some(NegativeS),
            ),
            (
                "Y > N",
                [
                    "304402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd410220fffff",
                    "ffffffffffffffffffffffffffebaaedce6af48a03bb",
                    "fd25e8cd0364142",
                ]
                .concat(),
                Some(NegativeS),
            ),
            (
                "0 len X",
                [
                    "302402000220181522ec8eca07de4860a4acd",
                    "d12909d831cc56cbbac4622082221a8768d1d09",
                ]
                .concat(),
                Some(ZeroLengthR),
            ),
            (
                "0 len Y",
                [
                    "302402204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd410200",
                ]
                .concat(),
                Some(ZeroLengthS),
            ),
            (
                "extra R padding",
                [
                    "30450221004e45e16932b8af514961a1d3a1a",
                    "25fdf3f4f7732e9d624c6c61548ab5fb8cd410220181",
                    "522ec8eca07de4860a4acdd12909d831cc56cbbac462",
                    "2082221a8768d1d09",
                ]
                .concat(),
                Some(TooMuchPaddingR),
            ),
            (
                "extra S padding",
                [
                    "304502204e45e16932b8af514961a1d3a1a25",
                    "fdf3f4f7732e9d624c6c61548ab5fb8cd41022100181",
                    "522ec8eca07de4860a4acdd12909d831cc56cbbac462",
                    "2082221a8768d1d09",
                ]
                .concat(),
                Some(TooMuchPaddingS),
            ),
        ];

        for (name, sig, expected) in test_cases {
            let sig = hex::decode(sig).unwrap();
            let result = is_valid_signature_encoding(&sig).err();
            assert_eq!(result, expected, "{name}");

            // With an ALL|FORKID hash type byte appended.
            let mut full_sig = sig.clone();
            full_sig.push(0x41);
            let flags = VerifyFlags::STRICTENC | VerifyFlags::SIGHASH_FORKID;
            assert_eq!(
                check_signature_encoding(&full_sig, flags).err(),
                expected.map(CheckSigError::Der),
                "{name}"
            );
        }
    }

    #[test]
    fn test_empty_signature_is_allowed() {
        let flags = VerifyFlags::STRICTENC | VerifyFlags::LOW_S;
        assert_eq!(check_signature_encoding(&[], flags), Ok(()));
    }

    #[test]
    fn test_high_s() {
        let full_sig = hex::decode(
            "3045022052ffc1929a2d8bd365c6a2a4e3421711b4b1e1b8781698ca9075807b4227abcb0221009984107ddb9e3813782b095d0d84361ed4c76e5edaf6561d252ae162c2341cfb01",
        )
        .unwrap();

        assert_eq!(
            check_signature_encoding(&full_sig, VerifyFlags::STRICTENC),
            Ok(())
        );
        assert_eq!(
            check_signature_encoding(&full_sig, VerifyFlags::STRICTENC | VerifyFlags::LOW_S),
            Err(CheckSigError::HighS)
        );
    }

    #[test]
    fn test_hash_type_encoding() {
        let forkid = VerifyFlags::SIGHASH_FORKID;
        let none = VerifyFlags::NONE;

        assert_eq!(check_hash_type_encoding(0x01, none), Ok(()));
        assert_eq!(check_hash_type_encoding(0x83, none), Ok(()));
        assert_eq!(check_hash_type_encoding(0x41, forkid), Ok(()));
        assert_eq!(check_hash_type_encoding(0xc2, forkid), Ok(()));
        assert_eq!(
            check_hash_type_encoding(0x00, none),
            Err(CheckSigError::InvalidSigHashType(0x00))
        );
        assert_eq!(
            check_hash_type_encoding(0x44, forkid),
            Err(CheckSigError::InvalidSigHashType(0x44))
        );
        assert_eq!(
            check_hash_type_encoding(0x41, none),
            Err(CheckSigError::IllegalForkId)
        );
        assert_eq!(
            check_hash_type_encoding(0x01, forkid),
            Err(CheckSigError::MustUseForkId)
        );
    }

    #[test]
    fn test_hash_type_checked_before_der() {
        // Bad sequence id and an undefined hash type.
        let full_sig = hex::decode(
            "314402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd410220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d0904",
        )
        .unwrap();

        assert_eq!(
            check_signature_encoding(&full_sig, VerifyFlags::STRICTENC),
            Err(CheckSigError::InvalidSigHashType(0x04))
        );
        assert_eq!(
            check_signature_encoding(&full_sig, VerifyFlags::DERSIG),
            Err(CheckSigError::Der(SignatureEncodingError::InvalidSequenceId))
        );
    }

    #[test]
    fn test_uses_fork_id() {
        let forkid = VerifyFlags::SIGHASH_FORKID;
        assert!(uses_fork_id(&[0x30, 0x41], forkid));
        assert!(!uses_fork_id(&[0x30, 0x01], forkid));
        assert!(!uses_fork_id(&[0x30, 0x41], VerifyFlags::NONE));
        assert!(!uses_fork_id(&[], forkid));
    }
}
