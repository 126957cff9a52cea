//! Opcode values and the dispatch table.
//!
//! Every byte value maps to exactly one [`OpcodeInfo`] entry carrying the
//! opcode name, the way its inline data is encoded and the handler executing
//! it.

use crate::error::Error;
use crate::interpreter::{Thread, ops};
use crate::parser::ParsedOpcode;

/// Executes a single parsed opcode against the thread.
pub type OpcodeHandler = fn(&ParsedOpcode, &mut Thread<'_>) -> Result<(), Error>;

/// How the inline data of an opcode is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushLength {
    /// The opcode carries no inline data.
    None,
    /// The opcode is followed by exactly this many data bytes.
    Direct(usize),
    /// The opcode is followed by a little-endian length prefix of this width
    /// and then by that many data bytes.
    Prefixed(usize),
}

/// Static description of an opcode.
#[derive(Clone, Copy)]
pub struct OpcodeInfo {
    pub value: u8,
    pub name: &'static str,
    pub length: PushLength,
    pub(crate) exec: OpcodeHandler,
}

impl std::fmt::Debug for OpcodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpcodeInfo")
            .field("value", &self.value)
            .field("name", &self.name)
            .field("length", &self.length)
            .finish()
    }
}

impl std::fmt::Display for OpcodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl OpcodeInfo {
    const fn new(value: u8, name: &'static str, length: PushLength, exec: OpcodeHandler) -> Self {
        Self {
            value,
            name,
            length,
            exec,
        }
    }

    /// Returns the table entry for `value`.
    #[inline]
    pub fn lookup(value: u8) -> &'static Self {
        &OPCODE_TABLE[value as usize]
    }

    /// Disabled opcodes fail whenever the program counter passes over them
    /// before genesis, executed or not.
    pub fn is_disabled(&self) -> bool {
        matches!(self.value, OP_2MUL | OP_2DIV)
    }

    /// OP_VERIF and OP_VERNOTIF fail before genesis even on a skipped branch.
    pub fn is_always_illegal(&self) -> bool {
        matches!(self.value, OP_VERIF | OP_VERNOTIF)
    }

    /// Opcodes that take part in conditional bookkeeping and therefore run
    /// on skipped branches too.
    pub fn is_conditional(&self) -> bool {
        (OP_IF..=OP_ENDIF).contains(&self.value)
    }

    /// Whether the opcode only pushes data. OP_RESERVED counts as a push.
    pub fn is_push(&self) -> bool {
        self.value <= OP_16
    }

    /// Whether the opcode counts towards the operation limit.
    pub fn counts_as_operation(&self) -> bool {
        self.value > OP_16
    }

    /// The value pushed by OP_1NEGATE and OP_1 through OP_16.
    pub fn small_int(&self) -> Option<i64> {
        match self.value {
            OP_1NEGATE => Some(-1),
            OP_1..=OP_16 => Some(i64::from(self.value - (OP_1 - 1))),
            _ => None,
        }
    }
}

pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_2: u8 = 0x02;
pub const OP_DATA_3: u8 = 0x03;
pub const OP_DATA_4: u8 = 0x04;
pub const OP_DATA_5: u8 = 0x05;
pub const OP_DATA_6: u8 = 0x06;
pub const OP_DATA_7: u8 = 0x07;
pub const OP_DATA_8: u8 = 0x08;
pub const OP_DATA_9: u8 = 0x09;
pub const OP_DATA_10: u8 = 0x0a;
pub const OP_DATA_11: u8 = 0x0b;
pub const OP_DATA_12: u8 = 0x0c;
pub const OP_DATA_13: u8 = 0x0d;
pub const OP_DATA_14: u8 = 0x0e;
pub const OP_DATA_15: u8 = 0x0f;
pub const OP_DATA_16: u8 = 0x10;
pub const OP_DATA_17: u8 = 0x11;
pub const OP_DATA_18: u8 = 0x12;
pub const OP_DATA_19: u8 = 0x13;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_21: u8 = 0x15;
pub const OP_DATA_22: u8 = 0x16;
pub const OP_DATA_23: u8 = 0x17;
pub const OP_DATA_24: u8 = 0x18;
pub const OP_DATA_25: u8 = 0x19;
pub const OP_DATA_26: u8 = 0x1a;
pub const OP_DATA_27: u8 = 0x1b;
pub const OP_DATA_28: u8 = 0x1c;
pub const OP_DATA_29: u8 = 0x1d;
pub const OP_DATA_30: u8 = 0x1e;
pub const OP_DATA_31: u8 = 0x1f;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_34: u8 = 0x22;
pub const OP_DATA_35: u8 = 0x23;
pub const OP_DATA_36: u8 = 0x24;
pub const OP_DATA_37: u8 = 0x25;
pub const OP_DATA_38: u8 = 0x26;
pub const OP_DATA_39: u8 = 0x27;
pub const OP_DATA_40: u8 = 0x28;
pub const OP_DATA_41: u8 = 0x29;
pub const OP_DATA_42: u8 = 0x2a;
pub const OP_DATA_43: u8 = 0x2b;
pub const OP_DATA_44: u8 = 0x2c;
pub const OP_DATA_45: u8 = 0x2d;
pub const OP_DATA_46: u8 = 0x2e;
pub const OP_DATA_47: u8 = 0x2f;
pub const OP_DATA_48: u8 = 0x30;
pub const OP_DATA_49: u8 = 0x31;
pub const OP_DATA_50: u8 = 0x32;
pub const OP_DATA_51: u8 = 0x33;
pub const OP_DATA_52: u8 = 0x34;
pub const OP_DATA_53: u8 = 0x35;
pub const OP_DATA_54: u8 = 0x36;
pub const OP_DATA_55: u8 = 0x37;
pub const OP_DATA_56: u8 = 0x38;
pub const OP_DATA_57: u8 = 0x39;
pub const OP_DATA_58: u8 = 0x3a;
pub const OP_DATA_59: u8 = 0x3b;
pub const OP_DATA_60: u8 = 0x3c;
pub const OP_DATA_61: u8 = 0x3d;
pub const OP_DATA_62: u8 = 0x3e;
pub const OP_DATA_63: u8 = 0x3f;
pub const OP_DATA_64: u8 = 0x40;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_66: u8 = 0x42;
pub const OP_DATA_67: u8 = 0x43;
pub const OP_DATA_68: u8 = 0x44;
pub const OP_DATA_69: u8 = 0x45;
pub const OP_DATA_70: u8 = 0x46;
pub const OP_DATA_71: u8 = 0x47;
pub const OP_DATA_72: u8 = 0x48;
pub const OP_DATA_73: u8 = 0x49;
pub const OP_DATA_74: u8 = 0x4a;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;
pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;
pub const OP_CAT: u8 = 0x7e;
pub const OP_SPLIT: u8 = 0x7f;
pub const OP_NUM2BIN: u8 = 0x80;
pub const OP_BIN2NUM: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;
pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;
pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
pub const OP_NOP1: u8 = 0xb0;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = 0xb1;
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = 0xb2;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;
pub const OP_UNKNOWN186: u8 = 0xba;
pub const OP_UNKNOWN187: u8 = 0xbb;
pub const OP_UNKNOWN188: u8 = 0xbc;
pub const OP_UNKNOWN189: u8 = 0xbd;
pub const OP_UNKNOWN190: u8 = 0xbe;
pub const OP_UNKNOWN191: u8 = 0xbf;
pub const OP_UNKNOWN192: u8 = 0xc0;
pub const OP_UNKNOWN193: u8 = 0xc1;
pub const OP_UNKNOWN194: u8 = 0xc2;
pub const OP_UNKNOWN195: u8 = 0xc3;
pub const OP_UNKNOWN196: u8 = 0xc4;
pub const OP_UNKNOWN197: u8 = 0xc5;
pub const OP_UNKNOWN198: u8 = 0xc6;
pub const OP_UNKNOWN199: u8 = 0xc7;
pub const OP_UNKNOWN200: u8 = 0xc8;
pub const OP_UNKNOWN201: u8 = 0xc9;
pub const OP_UNKNOWN202: u8 = 0xca;
pub const OP_UNKNOWN203: u8 = 0xcb;
pub const OP_UNKNOWN204: u8 = 0xcc;
pub const OP_UNKNOWN205: u8 = 0xcd;
pub const OP_UNKNOWN206: u8 = 0xce;
pub const OP_UNKNOWN207: u8 = 0xcf;
pub const OP_UNKNOWN208: u8 = 0xd0;
pub const OP_UNKNOWN209: u8 = 0xd1;
pub const OP_UNKNOWN210: u8 = 0xd2;
pub const OP_UNKNOWN211: u8 = 0xd3;
pub const OP_UNKNOWN212: u8 = 0xd4;
pub const OP_UNKNOWN213: u8 = 0xd5;
pub const OP_UNKNOWN214: u8 = 0xd6;
pub const OP_UNKNOWN215: u8 = 0xd7;
pub const OP_UNKNOWN216: u8 = 0xd8;
pub const OP_UNKNOWN217: u8 = 0xd9;
pub const OP_UNKNOWN218: u8 = 0xda;
pub const OP_UNKNOWN219: u8 = 0xdb;
pub const OP_UNKNOWN220: u8 = 0xdc;
pub const OP_UNKNOWN221: u8 = 0xdd;
pub const OP_UNKNOWN222: u8 = 0xde;
pub const OP_UNKNOWN223: u8 = 0xdf;
pub const OP_UNKNOWN224: u8 = 0xe0;
pub const OP_UNKNOWN225: u8 = 0xe1;
pub const OP_UNKNOWN226: u8 = 0xe2;
pub const OP_UNKNOWN227: u8 = 0xe3;
pub const OP_UNKNOWN228: u8 = 0xe4;
pub const OP_UNKNOWN229: u8 = 0xe5;
pub const OP_UNKNOWN230: u8 = 0xe6;
pub const OP_UNKNOWN231: u8 = 0xe7;
pub const OP_UNKNOWN232: u8 = 0xe8;
pub const OP_UNKNOWN233: u8 = 0xe9;
pub const OP_UNKNOWN234: u8 = 0xea;
pub const OP_UNKNOWN235: u8 = 0xeb;
pub const OP_UNKNOWN236: u8 = 0xec;
pub const OP_UNKNOWN237: u8 = 0xed;
pub const OP_UNKNOWN238: u8 = 0xee;
pub const OP_UNKNOWN239: u8 = 0xef;
pub const OP_UNKNOWN240: u8 = 0xf0;
pub const OP_UNKNOWN241: u8 = 0xf1;
pub const OP_UNKNOWN242: u8 = 0xf2;
pub const OP_UNKNOWN243: u8 = 0xf3;
pub const OP_UNKNOWN244: u8 = 0xf4;
pub const OP_UNKNOWN245: u8 = 0xf5;
pub const OP_UNKNOWN246: u8 = 0xf6;
pub const OP_UNKNOWN247: u8 = 0xf7;
pub const OP_UNKNOWN248: u8 = 0xf8;
pub const OP_UNKNOWN249: u8 = 0xf9;
pub const OP_SMALLINTEGER: u8 = 0xfa;
pub const OP_PUBKEYS: u8 = 0xfb;
pub const OP_UNKNOWN252: u8 = 0xfc;
pub const OP_PUBKEYHASH: u8 = 0xfd;
pub const OP_PUBKEY: u8 = 0xfe;
pub const OP_INVALIDOPCODE: u8 = 0xff;

/// The opcode dispatch table, indexed by opcode value.
#[rustfmt::skip]
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    OpcodeInfo::new(OP_0, "OP_0", PushLength::None, ops::op_false),
    OpcodeInfo::new(OP_DATA_1, "OP_DATA_1", PushLength::Direct(1), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_2, "OP_DATA_2", PushLength::Direct(2), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_3, "OP_DATA_3", PushLength::Direct(3), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_4, "OP_DATA_4", PushLength::Direct(4), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_5, "OP_DATA_5", PushLength::Direct(5), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_6, "OP_DATA_6", PushLength::Direct(6), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_7, "OP_DATA_7", PushLength::Direct(7), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_8, "OP_DATA_8", PushLength::Direct(8), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_9, "OP_DATA_9", PushLength::Direct(9), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_10, "OP_DATA_10", PushLength::Direct(10), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_11, "OP_DATA_11", PushLength::Direct(11), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_12, "OP_DATA_12", PushLength::Direct(12), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_13, "OP_DATA_13", PushLength::Direct(13), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_14, "OP_DATA_14", PushLength::Direct(14), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_15, "OP_DATA_15", PushLength::Direct(15), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_16, "OP_DATA_16", PushLength::Direct(16), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_17, "OP_DATA_17", PushLength::Direct(17), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_18, "OP_DATA_18", PushLength::Direct(18), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_19, "OP_DATA_19", PushLength::Direct(19), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_20, "OP_DATA_20", PushLength::Direct(20), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_21, "OP_DATA_21", PushLength::Direct(21), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_22, "OP_DATA_22", PushLength::Direct(22), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_23, "OP_DATA_23", PushLength::Direct(23), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_24, "OP_DATA_24", PushLength::Direct(24), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_25, "OP_DATA_25", PushLength::Direct(25), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_26, "OP_DATA_26", PushLength::Direct(26), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_27, "OP_DATA_27", PushLength::Direct(27), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_28, "OP_DATA_28", PushLength::Direct(28), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_29, "OP_DATA_29", PushLength::Direct(29), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_30, "OP_DATA_30", PushLength::Direct(30), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_31, "OP_DATA_31", PushLength::Direct(31), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_32, "OP_DATA_32", PushLength::Direct(32), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_33, "OP_DATA_33", PushLength::Direct(33), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_34, "OP_DATA_34", PushLength::Direct(34), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_35, "OP_DATA_35", PushLength::Direct(35), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_36, "OP_DATA_36", PushLength::Direct(36), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_37, "OP_DATA_37", PushLength::Direct(37), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_38, "OP_DATA_38", PushLength::Direct(38), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_39, "OP_DATA_39", PushLength::Direct(39), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_40, "OP_DATA_40", PushLength::Direct(40), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_41, "OP_DATA_41", PushLength::Direct(41), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_42, "OP_DATA_42", PushLength::Direct(42), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_43, "OP_DATA_43", PushLength::Direct(43), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_44, "OP_DATA_44", PushLength::Direct(44), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_45, "OP_DATA_45", PushLength::Direct(45), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_46, "OP_DATA_46", PushLength::Direct(46), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_47, "OP_DATA_47", PushLength::Direct(47), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_48, "OP_DATA_48", PushLength::Direct(48), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_49, "OP_DATA_49", PushLength::Direct(49), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_50, "OP_DATA_50", PushLength::Direct(50), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_51, "OP_DATA_51", PushLength::Direct(51), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_52, "OP_DATA_52", PushLength::Direct(52), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_53, "OP_DATA_53", PushLength::Direct(53), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_54, "OP_DATA_54", PushLength::Direct(54), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_55, "OP_DATA_55", PushLength::Direct(55), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_56, "OP_DATA_56", PushLength::Direct(56), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_57, "OP_DATA_57", PushLength::Direct(57), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_58, "OP_DATA_58", PushLength::Direct(58), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_59, "OP_DATA_59", PushLength::Direct(59), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_60, "OP_DATA_60", PushLength::Direct(60), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_61, "OP_DATA_61", PushLength::Direct(61), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_62, "OP_DATA_62", PushLength::Direct(62), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_63, "OP_DATA_63", PushLength::Direct(63), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_64, "OP_DATA_64", PushLength::Direct(64), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_65, "OP_DATA_65", PushLength::Direct(65), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_66, "OP_DATA_66", PushLength::Direct(66), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_67, "OP_DATA_67", PushLength::Direct(67), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_68, "OP_DATA_68", PushLength::Direct(68), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_69, "OP_DATA_69", PushLength::Direct(69), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_70, "OP_DATA_70", PushLength::Direct(70), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_71, "OP_DATA_71", PushLength::Direct(71), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_72, "OP_DATA_72", PushLength::Direct(72), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_73, "OP_DATA_73", PushLength::Direct(73), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_74, "OP_DATA_74", PushLength::Direct(74), ops::op_push_data),
    OpcodeInfo::new(OP_DATA_75, "OP_DATA_75", PushLength::Direct(75), ops::op_push_data),
    OpcodeInfo::new(OP_PUSHDATA1, "OP_PUSHDATA1", PushLength::Prefixed(1), ops::op_push_data),
    OpcodeInfo::new(OP_PUSHDATA2, "OP_PUSHDATA2", PushLength::Prefixed(2), ops::op_push_data),
    OpcodeInfo::new(OP_PUSHDATA4, "OP_PUSHDATA4", PushLength::Prefixed(4), ops::op_push_data),
    OpcodeInfo::new(OP_1NEGATE, "OP_1NEGATE", PushLength::None, ops::op_1negate),
    OpcodeInfo::new(OP_RESERVED, "OP_RESERVED", PushLength::None, ops::op_reserved),
    OpcodeInfo::new(OP_1, "OP_1", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_2, "OP_2", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_3, "OP_3", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_4, "OP_4", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_5, "OP_5", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_6, "OP_6", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_7, "OP_7", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_8, "OP_8", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_9, "OP_9", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_10, "OP_10", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_11, "OP_11", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_12, "OP_12", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_13, "OP_13", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_14, "OP_14", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_15, "OP_15", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_16, "OP_16", PushLength::None, ops::op_n),
    OpcodeInfo::new(OP_NOP, "OP_NOP", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_VER, "OP_VER", PushLength::None, ops::op_reserved),
    OpcodeInfo::new(OP_IF, "OP_IF", PushLength::None, ops::op_if),
    OpcodeInfo::new(OP_NOTIF, "OP_NOTIF", PushLength::None, ops::op_notif),
    OpcodeInfo::new(OP_VERIF, "OP_VERIF", PushLength::None, ops::op_ver_conditional),
    OpcodeInfo::new(OP_VERNOTIF, "OP_VERNOTIF", PushLength::None, ops::op_ver_conditional),
    OpcodeInfo::new(OP_ELSE, "OP_ELSE", PushLength::None, ops::op_else),
    OpcodeInfo::new(OP_ENDIF, "OP_ENDIF", PushLength::None, ops::op_endif),
    OpcodeInfo::new(OP_VERIFY, "OP_VERIFY", PushLength::None, ops::op_verify),
    OpcodeInfo::new(OP_RETURN, "OP_RETURN", PushLength::None, ops::op_return),
    OpcodeInfo::new(OP_TOALTSTACK, "OP_TOALTSTACK", PushLength::None, ops::op_to_alt_stack),
    OpcodeInfo::new(OP_FROMALTSTACK, "OP_FROMALTSTACK", PushLength::None, ops::op_from_alt_stack),
    OpcodeInfo::new(OP_2DROP, "OP_2DROP", PushLength::None, ops::op_2drop),
    OpcodeInfo::new(OP_2DUP, "OP_2DUP", PushLength::None, ops::op_2dup),
    OpcodeInfo::new(OP_3DUP, "OP_3DUP", PushLength::None, ops::op_3dup),
    OpcodeInfo::new(OP_2OVER, "OP_2OVER", PushLength::None, ops::op_2over),
    OpcodeInfo::new(OP_2ROT, "OP_2ROT", PushLength::None, ops::op_2rot),
    OpcodeInfo::new(OP_2SWAP, "OP_2SWAP", PushLength::None, ops::op_2swap),
    OpcodeInfo::new(OP_IFDUP, "OP_IFDUP", PushLength::None, ops::op_ifdup),
    OpcodeInfo::new(OP_DEPTH, "OP_DEPTH", PushLength::None, ops::op_depth),
    OpcodeInfo::new(OP_DROP, "OP_DROP", PushLength::None, ops::op_drop),
    OpcodeInfo::new(OP_DUP, "OP_DUP", PushLength::None, ops::op_dup),
    OpcodeInfo::new(OP_NIP, "OP_NIP", PushLength::None, ops::op_nip),
    OpcodeInfo::new(OP_OVER, "OP_OVER", PushLength::None, ops::op_over),
    OpcodeInfo::new(OP_PICK, "OP_PICK", PushLength::None, ops::op_pick),
    OpcodeInfo::new(OP_ROLL, "OP_ROLL", PushLength::None, ops::op_roll),
    OpcodeInfo::new(OP_ROT, "OP_ROT", PushLength::None, ops::op_rot),
    OpcodeInfo::new(OP_SWAP, "OP_SWAP", PushLength::None, ops::op_swap),
    OpcodeInfo::new(OP_TUCK, "OP_TUCK", PushLength::None, ops::op_tuck),
    OpcodeInfo::new(OP_CAT, "OP_CAT", PushLength::None, ops::op_cat),
    OpcodeInfo::new(OP_SPLIT, "OP_SPLIT", PushLength::None, ops::op_split),
    OpcodeInfo::new(OP_NUM2BIN, "OP_NUM2BIN", PushLength::None, ops::op_num2bin),
    OpcodeInfo::new(OP_BIN2NUM, "OP_BIN2NUM", PushLength::None, ops::op_bin2num),
    OpcodeInfo::new(OP_SIZE, "OP_SIZE", PushLength::None, ops::op_size),
    OpcodeInfo::new(OP_INVERT, "OP_INVERT", PushLength::None, ops::op_invert),
    OpcodeInfo::new(OP_AND, "OP_AND", PushLength::None, ops::op_and),
    OpcodeInfo::new(OP_OR, "OP_OR", PushLength::None, ops::op_or),
    OpcodeInfo::new(OP_XOR, "OP_XOR", PushLength::None, ops::op_xor),
    OpcodeInfo::new(OP_EQUAL, "OP_EQUAL", PushLength::None, ops::op_equal),
    OpcodeInfo::new(OP_EQUALVERIFY, "OP_EQUALVERIFY", PushLength::None, ops::op_equal_verify),
    OpcodeInfo::new(OP_RESERVED1, "OP_RESERVED1", PushLength::None, ops::op_reserved),
    OpcodeInfo::new(OP_RESERVED2, "OP_RESERVED2", PushLength::None, ops::op_reserved),
    OpcodeInfo::new(OP_1ADD, "OP_1ADD", PushLength::None, ops::op_1add),
    OpcodeInfo::new(OP_1SUB, "OP_1SUB", PushLength::None, ops::op_1sub),
    OpcodeInfo::new(OP_2MUL, "OP_2MUL", PushLength::None, ops::op_disabled),
    OpcodeInfo::new(OP_2DIV, "OP_2DIV", PushLength::None, ops::op_disabled),
    OpcodeInfo::new(OP_NEGATE, "OP_NEGATE", PushLength::None, ops::op_negate),
    OpcodeInfo::new(OP_ABS, "OP_ABS", PushLength::None, ops::op_abs),
    OpcodeInfo::new(OP_NOT, "OP_NOT", PushLength::None, ops::op_not),
    OpcodeInfo::new(OP_0NOTEQUAL, "OP_0NOTEQUAL", PushLength::None, ops::op_0_not_equal),
    OpcodeInfo::new(OP_ADD, "OP_ADD", PushLength::None, ops::op_add),
    OpcodeInfo::new(OP_SUB, "OP_SUB", PushLength::None, ops::op_sub),
    OpcodeInfo::new(OP_MUL, "OP_MUL", PushLength::None, ops::op_mul),
    OpcodeInfo::new(OP_DIV, "OP_DIV", PushLength::None, ops::op_div),
    OpcodeInfo::new(OP_MOD, "OP_MOD", PushLength::None, ops::op_mod),
    OpcodeInfo::new(OP_LSHIFT, "OP_LSHIFT", PushLength::None, ops::op_lshift),
    OpcodeInfo::new(OP_RSHIFT, "OP_RSHIFT", PushLength::None, ops::op_rshift),
    OpcodeInfo::new(OP_BOOLAND, "OP_BOOLAND", PushLength::None, ops::op_bool_and),
    OpcodeInfo::new(OP_BOOLOR, "OP_BOOLOR", PushLength::None, ops::op_bool_or),
    OpcodeInfo::new(OP_NUMEQUAL, "OP_NUMEQUAL", PushLength::None, ops::op_num_equal),
    OpcodeInfo::new(OP_NUMEQUALVERIFY, "OP_NUMEQUALVERIFY", PushLength::None, ops::op_num_equal_verify),
    OpcodeInfo::new(OP_NUMNOTEQUAL, "OP_NUMNOTEQUAL", PushLength::None, ops::op_num_not_equal),
    OpcodeInfo::new(OP_LESSTHAN, "OP_LESSTHAN", PushLength::None, ops::op_less_than),
    OpcodeInfo::new(OP_GREATERTHAN, "OP_GREATERTHAN", PushLength::None, ops::op_greater_than),
    OpcodeInfo::new(OP_LESSTHANOREQUAL, "OP_LESSTHANOREQUAL", PushLength::None, ops::op_less_than_or_equal),
    OpcodeInfo::new(OP_GREATERTHANOREQUAL, "OP_GREATERTHANOREQUAL", PushLength::None, ops::op_greater_than_or_equal),
    OpcodeInfo::new(OP_MIN, "OP_MIN", PushLength::None, ops::op_min),
    OpcodeInfo::new(OP_MAX, "OP_MAX", PushLength::None, ops::op_max),
    OpcodeInfo::new(OP_WITHIN, "OP_WITHIN", PushLength::None, ops::op_within),
    OpcodeInfo::new(OP_RIPEMD160, "OP_RIPEMD160", PushLength::None, ops::op_ripemd160),
    OpcodeInfo::new(OP_SHA1, "OP_SHA1", PushLength::None, ops::op_sha1),
    OpcodeInfo::new(OP_SHA256, "OP_SHA256", PushLength::None, ops::op_sha256),
    OpcodeInfo::new(OP_HASH160, "OP_HASH160", PushLength::None, ops::op_hash160),
    OpcodeInfo::new(OP_HASH256, "OP_HASH256", PushLength::None, ops::op_hash256),
    OpcodeInfo::new(OP_CODESEPARATOR, "OP_CODESEPARATOR", PushLength::None, ops::op_code_separator),
    OpcodeInfo::new(OP_CHECKSIG, "OP_CHECKSIG", PushLength::None, ops::op_checksig),
    OpcodeInfo::new(OP_CHECKSIGVERIFY, "OP_CHECKSIGVERIFY", PushLength::None, ops::op_checksig_verify),
    OpcodeInfo::new(OP_CHECKMULTISIG, "OP_CHECKMULTISIG", PushLength::None, ops::op_checkmultisig),
    OpcodeInfo::new(OP_CHECKMULTISIGVERIFY, "OP_CHECKMULTISIGVERIFY", PushLength::None, ops::op_checkmultisig_verify),
    OpcodeInfo::new(OP_NOP1, "OP_NOP1", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_CHECKLOCKTIMEVERIFY, "OP_CHECKLOCKTIMEVERIFY", PushLength::None, ops::op_check_lock_time_verify),
    OpcodeInfo::new(OP_CHECKSEQUENCEVERIFY, "OP_CHECKSEQUENCEVERIFY", PushLength::None, ops::op_check_sequence_verify),
    OpcodeInfo::new(OP_NOP4, "OP_NOP4", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP5, "OP_NOP5", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP6, "OP_NOP6", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP7, "OP_NOP7", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP8, "OP_NOP8", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP9, "OP_NOP9", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_NOP10, "OP_NOP10", PushLength::None, ops::op_nop),
    OpcodeInfo::new(OP_UNKNOWN186, "OP_UNKNOWN186", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN187, "OP_UNKNOWN187", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN188, "OP_UNKNOWN188", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN189, "OP_UNKNOWN189", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN190, "OP_UNKNOWN190", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN191, "OP_UNKNOWN191", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN192, "OP_UNKNOWN192", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN193, "OP_UNKNOWN193", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN194, "OP_UNKNOWN194", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN195, "OP_UNKNOWN195", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN196, "OP_UNKNOWN196", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN197, "OP_UNKNOWN197", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN198, "OP_UNKNOWN198", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN199, "OP_UNKNOWN199", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN200, "OP_UNKNOWN200", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN201, "OP_UNKNOWN201", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN202, "OP_UNKNOWN202", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN203, "OP_UNKNOWN203", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN204, "OP_UNKNOWN204", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN205, "OP_UNKNOWN205", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN206, "OP_UNKNOWN206", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN207, "OP_UNKNOWN207", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN208, "OP_UNKNOWN208", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN209, "OP_UNKNOWN209", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN210, "OP_UNKNOWN210", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN211, "OP_UNKNOWN211", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN212, "OP_UNKNOWN212", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN213, "OP_UNKNOWN213", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN214, "OP_UNKNOWN214", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN215, "OP_UNKNOWN215", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN216, "OP_UNKNOWN216", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN217, "OP_UNKNOWN217", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN218, "OP_UNKNOWN218", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN219, "OP_UNKNOWN219", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN220, "OP_UNKNOWN220", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN221, "OP_UNKNOWN221", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN222, "OP_UNKNOWN222", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN223, "OP_UNKNOWN223", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN224, "OP_UNKNOWN224", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN225, "OP_UNKNOWN225", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN226, "OP_UNKNOWN226", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN227, "OP_UNKNOWN227", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN228, "OP_UNKNOWN228", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN229, "OP_UNKNOWN229", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN230, "OP_UNKNOWN230", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN231, "OP_UNKNOWN231", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN232, "OP_UNKNOWN232", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN233, "OP_UNKNOWN233", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN234, "OP_UNKNOWN234", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN235, "OP_UNKNOWN235", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN236, "OP_UNKNOWN236", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN237, "OP_UNKNOWN237", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN238, "OP_UNKNOWN238", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN239, "OP_UNKNOWN239", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN240, "OP_UNKNOWN240", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN241, "OP_UNKNOWN241", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN242, "OP_UNKNOWN242", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN243, "OP_UNKNOWN243", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN244, "OP_UNKNOWN244", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN245, "OP_UNKNOWN245", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN246, "OP_UNKNOWN246", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN247, "OP_UNKNOWN247", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN248, "OP_UNKNOWN248", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN249, "OP_UNKNOWN249", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_SMALLINTEGER, "OP_SMALLINTEGER", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_PUBKEYS, "OP_PUBKEYS", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_UNKNOWN252, "OP_UNKNOWN252", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_PUBKEYHASH, "OP_PUBKEYHASH", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_PUBKEY, "OP_PUBKEY", PushLength::None, ops::op_invalid),
    OpcodeInfo::new(OP_INVALIDOPCODE, "OP_INVALIDOPCODE", PushLength::None, ops::op_invalid),
];
