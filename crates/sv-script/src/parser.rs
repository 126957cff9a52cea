//! Script parsing.
//!
//! A script is parsed once into a sequence of [`ParsedOpcode`]s which the
//! thread then executes. [`ParsedScript::unparse`] is the exact inverse of
//! [`ParsedScript::parse`].

use crate::error::Error;
use crate::opcode::{
    OP_0, OP_1, OP_1NEGATE, OP_16, OP_CODESEPARATOR, OP_ENDIF, OP_IF, OP_NOTIF, OP_PUSHDATA1,
    OP_PUSHDATA2, OP_PUSHDATA4, OP_RETURN, OpcodeInfo, PushLength,
};
use bitcoin::Script;
use bitcoin::script::Instruction;
use std::fmt::{self, Display};
use std::ops::Deref;

/// An opcode together with its inline data.
#[derive(Clone)]
pub struct ParsedOpcode {
    pub opcode: &'static OpcodeInfo,
    pub data: Vec<u8>,
}

impl PartialEq for ParsedOpcode {
    fn eq(&self, other: &Self) -> bool {
        self.opcode.value == other.opcode.value && self.data == other.data
    }
}

impl Eq for ParsedOpcode {}

impl fmt::Debug for ParsedOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            f.write_str(self.opcode.name)
        } else {
            write!(f, "{} 0x{}", self.opcode.name, hex::encode(&self.data))
        }
    }
}

impl Display for ParsedOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode.value {
            OP_0 => f.write_str("0"),
            value if value <= OP_PUSHDATA4 => f.write_str(&hex::encode(&self.data)),
            _ if self.data.is_empty() => f.write_str(self.opcode.name),
            _ => write!(f, "{} {}", self.opcode.name, hex::encode(&self.data)),
        }
    }
}

impl ParsedOpcode {
    pub fn new(value: u8, data: Vec<u8>) -> Self {
        Self {
            opcode: OpcodeInfo::lookup(value),
            data,
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.opcode.value
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.opcode.name
    }

    /// Whether the opcode carries its data inline, OP_0 included.
    pub fn is_data_push(&self) -> bool {
        self.opcode.value <= OP_PUSHDATA4
    }

    /// Checks that the data was pushed with the smallest possible encoding.
    pub fn enforce_minimum_data_push(&self) -> Result<(), Error> {
        let opcode = self.opcode.value;
        let data_len = self.data.len();

        let minimal = match data_len {
            0 => opcode == OP_0,
            1 if (1..=16).contains(&self.data[0]) => opcode == OP_1 + self.data[0] - 1,
            1 if self.data[0] == 0x81 => opcode == OP_1NEGATE,
            len if len <= 75 => opcode as usize == len,
            len if len <= 0xff => opcode == OP_PUSHDATA1,
            len if len <= 0xffff => opcode == OP_PUSHDATA2,
            _ => true,
        };

        if minimal {
            Ok(())
        } else {
            Err(Error::MinimalData {
                opcode: self.opcode.name,
            })
        }
    }

    /// Whether the opcode is a push that a standard serializer would emit.
    pub fn is_canonical_push(&self) -> bool {
        let opcode = self.opcode.value;
        let data_len = self.data.len();

        if opcode > OP_16 {
            return false;
        }

        if opcode > OP_0 && opcode < OP_PUSHDATA1 && data_len == 1 && self.data[0] <= 16 {
            return false;
        }

        match opcode {
            OP_PUSHDATA1 => data_len >= OP_PUSHDATA1 as usize,
            OP_PUSHDATA2 => data_len > 0xff,
            OP_PUSHDATA4 => data_len > 0xffff,
            _ => true,
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        let invalid_length = || Error::InvalidPushLength {
            opcode: self.opcode.name,
            len: self.data.len(),
        };

        out.push(self.opcode.value);

        match self.opcode.length {
            // The only opcode carrying data without a push encoding is the
            // terminating OP_RETURN.
            PushLength::None if self.data.is_empty() || self.opcode.value == OP_RETURN => {}
            PushLength::None => return Err(invalid_length()),
            PushLength::Direct(len) if len == self.data.len() => {}
            PushLength::Direct(_) => return Err(invalid_length()),
            PushLength::Prefixed(width) => {
                let len = self.data.len() as u64;
                if width < 8 && len >= 1u64 << (width * 8) {
                    return Err(invalid_length());
                }
                out.extend_from_slice(&len.to_le_bytes()[..width]);
            }
        }

        out.extend_from_slice(&self.data);

        Ok(())
    }
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScript(Vec<ParsedOpcode>);

impl Deref for ParsedScript {
    type Target = [ParsedOpcode];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ParsedOpcode>> for ParsedScript {
    fn from(ops: Vec<ParsedOpcode>) -> Self {
        Self(ops)
    }
}

impl Display for ParsedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl ParsedScript {
    /// Parses raw script bytes.
    ///
    /// An OP_RETURN outside of any conditional block ends the script, every
    /// byte following it is kept as the inline data of the OP_RETURN.
    pub fn parse(script: &[u8]) -> Result<Self, Error> {
        let mut ops = Vec::new();
        let mut conditional_depth = 0usize;

        for instruction in Script::from_bytes(script).instruction_indices() {
            let (pos, instruction) = instruction.map_err(Error::MalformedPush)?;

            let value = script[pos];

            match instruction {
                Instruction::PushBytes(bytes) => {
                    ops.push(ParsedOpcode::new(value, bytes.as_bytes().to_vec()));
                }
                Instruction::Op(_) => {
                    match value {
                        OP_IF | OP_NOTIF => conditional_depth += 1,
                        OP_ENDIF => conditional_depth = conditional_depth.saturating_sub(1),
                        OP_RETURN if conditional_depth == 0 => {
                            ops.push(ParsedOpcode::new(value, script[pos + 1..].to_vec()));
                            break;
                        }
                        _ => {}
                    }
                    ops.push(ParsedOpcode::new(value, Vec::new()));
                }
            }
        }

        Ok(Self(ops))
    }

    /// Serializes the parsed opcodes back into script bytes.
    pub fn unparse(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        for op in &self.0 {
            op.write_to(&mut out)?;
        }
        Ok(out)
    }

    /// Whether the script only contains push opcodes.
    pub fn is_push_only(&self) -> bool {
        self.0.iter().all(|op| op.opcode.is_push())
    }

    /// Returns a copy of the script without any occurrence of `opcode`.
    pub fn remove_opcode(&self, opcode: u8) -> Self {
        Self(
            self.0
                .iter()
                .filter(|op| op.opcode.value != opcode)
                .cloned()
                .collect(),
        )
    }

    /// Returns a copy of the script without the canonical pushes of `data`.
    pub fn remove_opcode_by_data(&self, data: &[u8]) -> Self {
        if data.is_empty() {
            return self.clone();
        }

        Self(
            self.0
                .iter()
                .filter(|op| !(op.is_canonical_push() && op.data == data))
                .cloned()
                .collect(),
        )
    }

    /// Returns the script code used for legacy signature hashing, with the
    /// given signatures and every OP_CODESEPARATOR removed.
    pub(crate) fn legacy_subscript<'a>(&self, signatures: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut script = self.remove_opcode(OP_CODESEPARATOR);
        for sig in signatures {
            script = script.remove_opcode_by_data(sig);
        }
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::*;
    use hex_literal::hex;

    #[test]
    fn test_parse_p2pkh() {
        let script = hex!("76a91489abcdefabbaabbaabbaabbaabbaabbaabbaabba88ac");
        let parsed = ParsedScript::parse(&script).unwrap();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0], ParsedOpcode::new(OP_DUP, vec![]));
        assert_eq!(parsed[1], ParsedOpcode::new(OP_HASH160, vec![]));
        assert_eq!(parsed[2].value(), OP_DATA_20);
        assert_eq!(parsed[2].data, hex!("89abcdefabbaabbaabbaabbaabbaabbaabbaabba"));
        assert_eq!(parsed[4].name(), "OP_CHECKSIG");
        assert_eq!(parsed.unparse().unwrap(), script);
    }

    #[test]
    fn test_parse_round_trip() {
        let scripts: Vec<Vec<u8>> = vec![
            vec![],
            hex!("00").to_vec(),
            hex!("5253958852529387").to_vec(),
            hex!("76a97ca8a687").to_vec(),
            // PUSHDATA1 with a short payload is not minimal but parses.
            hex!("4c0101").to_vec(),
            hex!("4d0100ab").to_vec(),
            hex!("4e01000000ab").to_vec(),
            [&[OP_PUSHDATA1, 0xff][..], &[0x11; 0xff]].concat(),
            // Invalid opcodes still parse.
            hex!("bafeff").to_vec(),
        ];

        for script in scripts {
            let parsed = ParsedScript::parse(&script).unwrap();
            assert_eq!(parsed.unparse().unwrap(), script, "{}", hex::encode(&script));
        }
    }

    #[test]
    fn test_parse_malformed_push() {
        let scripts: [&[u8]; 5] = [&hex!("01"), &hex!("0201"), &hex!("4c"), &hex!("4c02ab"), &hex!("4d01")];
        for script in scripts {
            assert!(
                matches!(ParsedScript::parse(script), Err(Error::MalformedPush(_))),
                "{}",
                hex::encode(script)
            );
        }
    }

    #[test]
    fn test_op_return_captures_tail() {
        // The tail is a truncated PUSHDATA1.
        let script = hex!("516a4c");
        let parsed = ParsedScript::parse(&script).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], ParsedOpcode::new(OP_RETURN, vec![OP_PUSHDATA1]));
        assert_eq!(parsed.unparse().unwrap(), script);
        assert_eq!(parsed.to_string(), "OP_1 OP_RETURN 4c");

        // Inside a conditional block OP_RETURN is an ordinary opcode.
        let script = hex!("636a6851");
        let parsed = ParsedScript::parse(&script).unwrap();
        assert_eq!(parsed.len(), 4);
        assert!(parsed[1].data.is_empty());
        assert_eq!(parsed.unparse().unwrap(), script);
    }

    #[test]
    fn test_unparse_invalid_length() {
        let parsed = ParsedScript::from(vec![ParsedOpcode::new(OP_DATA_2, vec![1])]);
        assert_eq!(
            parsed.unparse(),
            Err(Error::InvalidPushLength {
                opcode: "OP_DATA_2",
                len: 1
            })
        );

        let parsed = ParsedScript::from(vec![ParsedOpcode::new(OP_PUSHDATA1, vec![0; 256])]);
        assert!(matches!(
            parsed.unparse(),
            Err(Error::InvalidPushLength { len: 256, .. })
        ));

        let parsed = ParsedScript::from(vec![ParsedOpcode::new(OP_DUP, vec![1])]);
        assert!(parsed.unparse().is_err());
    }

    #[test]
    fn test_is_push_only() {
        assert!(ParsedScript::parse(&hex!("00514c0101")).unwrap().is_push_only());
        assert!(ParsedScript::parse(&hex!("50")).unwrap().is_push_only());
        assert!(!ParsedScript::parse(&hex!("0061")).unwrap().is_push_only());
        assert!(ParsedScript::parse(&[]).unwrap().is_push_only());
    }

    #[test]
    fn test_enforce_minimum_data_push() {
        let ok = [
            ParsedOpcode::new(OP_0, vec![]),
            ParsedOpcode::new(OP_DATA_1, vec![0x11]),
            ParsedOpcode::new(OP_DATA_1, vec![0x00]),
            ParsedOpcode::new(OP_PUSHDATA1, vec![0; 76]),
            ParsedOpcode::new(OP_PUSHDATA2, vec![0; 256]),
            ParsedOpcode::new(OP_PUSHDATA4, vec![0; 0x10000]),
        ];
        for op in ok {
            assert_eq!(op.enforce_minimum_data_push(), Ok(()), "{op:?}");
        }

        let bad = [
            ParsedOpcode::new(OP_PUSHDATA1, vec![]),
            ParsedOpcode::new(OP_DATA_1, vec![0x05]),
            ParsedOpcode::new(OP_DATA_1, vec![0x81]),
            ParsedOpcode::new(OP_PUSHDATA1, vec![0; 75]),
            ParsedOpcode::new(OP_PUSHDATA2, vec![0; 255]),
            ParsedOpcode::new(OP_PUSHDATA4, vec![0; 0xffff]),
        ];
        for op in bad {
            assert!(
                matches!(op.enforce_minimum_data_push(), Err(Error::MinimalData { .. })),
                "{op:?}"
            );
        }
    }

    #[test]
    fn test_is_canonical_push() {
        assert!(ParsedOpcode::new(OP_0, vec![]).is_canonical_push());
        assert!(ParsedOpcode::new(OP_DATA_2, vec![1, 2]).is_canonical_push());
        assert!(ParsedOpcode::new(OP_DATA_1, vec![17]).is_canonical_push());
        assert!(!ParsedOpcode::new(OP_DATA_1, vec![16]).is_canonical_push());
        assert!(!ParsedOpcode::new(OP_PUSHDATA1, vec![1; 75]).is_canonical_push());
        assert!(ParsedOpcode::new(OP_PUSHDATA1, vec![1; 76]).is_canonical_push());
        assert!(!ParsedOpcode::new(OP_PUSHDATA2, vec![1; 255]).is_canonical_push());
        assert!(!ParsedOpcode::new(OP_PUSHDATA4, vec![1; 0xffff]).is_canonical_push());
        assert!(!ParsedOpcode::new(OP_DUP, vec![]).is_canonical_push());
    }

    #[test]
    fn test_remove_opcode_by_data() {
        let sig = hex!("aabbcc").to_vec();
        let script = ParsedScript::from(vec![
            ParsedOpcode::new(OP_DATA_3, sig.clone()),
            ParsedOpcode::new(OP_PUSHDATA1, sig.clone()),
            ParsedOpcode::new(OP_DATA_4, hex!("aabbccdd").to_vec()),
            ParsedOpcode::new(OP_CODESEPARATOR, vec![]),
            ParsedOpcode::new(OP_CHECKSIG, vec![]),
        ]);

        let stripped = script.remove_opcode_by_data(&sig);
        // The non-canonical PUSHDATA1 push and the longer push survive.
        assert_eq!(stripped.len(), 4);
        assert_eq!(stripped[0].value(), OP_PUSHDATA1);

        assert_eq!(script.remove_opcode_by_data(&[]), script);

        let subscript = script.legacy_subscript([sig.as_slice()]);
        assert_eq!(
            subscript.unparse().unwrap(),
            hex!("4c03aabbcc04aabbccddac").to_vec()
        );
    }

    #[test]
    fn test_display() {
        let script = ParsedScript::parse(&hex!("0076a90201028754")).unwrap();
        assert_eq!(script.to_string(), "0 OP_DUP OP_HASH160 0102 OP_EQUAL OP_4");
    }
}
