//! # Bitcoin SV Script
//!
//! A Bitcoin SV script interpreter. The interpreter validates that an unlocking
//! script satisfies a locking script, with or without the rules introduced by
//! the genesis upgrade.
//!
//! The execution model is a stepping engine: scripts are parsed
//! once, then executed opcode by opcode on a [`Thread`] that can be observed
//! through a [`Debugger`] and snapshotted through [`State`].

mod cache;
mod config;
mod constants;
mod debug;
mod error;
mod interpreter;
mod merkle;
mod num;
mod opcode;
mod parser;
mod sighash;
mod signature_checker;
mod stack;


use bitcoin::Script;
use bitflags::bitflags;

pub use self::cache::{SigCache, SigHashCache};
pub use self::config::Config;
pub use self::constants::*;
pub use self::debug::{CallbackDebugger, Debugger, NopDebugger};
pub use self::error::Error;
pub use self::interpreter::{
    CheckMultiSigError, CheckSigError, Condition, Engine, ExecutionParams, SignatureEncodingError,
    State, Thread,
};
pub use self::merkle::merkle_root_from_branches;
pub use self::num::{NumError, ScriptNum};
pub use self::opcode::*;
pub use self::parser::{ParsedOpcode, ParsedScript};
pub use self::sighash::{SigHashes, signature_hash, uses_fork_id_digest};
pub use self::signature_checker::{
    NoSignatureCheck, SignatureChecker, TransactionSignatureChecker,
};
pub use self::stack::{Stack, StackError, cast_to_bool};

bitflags! {
    /// Script verification flags.
    ///
    /// Each flag enables an additional rule on top of the base consensus rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VerifyFlags: u32 {
        const NONE = 0;

        /// Evaluate P2SH subscripts (BIP16).
        const P2SH = 1 << 0;

        /// Passing a non-strict-DER signature or one with undefined hashtype to a checksig operation causes script failure.
        /// Evaluating a pubkey that is not (0x04 + 64 bytes) or (0x02 or 0x03 + 32 bytes) by checksig causes script failure.
        const STRICTENC = 1 << 1;

        /// Passing a non-strict-DER signature to a checksig operation causes script failure (BIP62 rule 1)
        const DERSIG = 1 << 2;

        /// Passing a non-strict-DER signature or one with S > order/2 to a checksig operation causes script
        /// failure (BIP62 rule 5).
        const LOW_S = 1 << 3;

        /// verify dummy stack item consumed by CHECKMULTISIG is of zero-length (BIP62 rule 7).
        const NULLDUMMY = 1 << 4;

        /// Using a non-push operator in the scriptSig causes script failure (BIP62 rule 2).
        const SIGPUSHONLY = 1 << 5;

        /// Require minimal encodings for all push operations (OP_0... OP_16, OP_1NEGATE where possible, direct
        /// pushes up to 75 bytes, OP_PUSHDATA up to 255 bytes, OP_PUSHDATA2 for anything larger). Evaluating
        /// any other push causes the script to fail (BIP62 rule 3).
        /// In addition, whenever a stack element is interpreted as a number, it must be of minimal length (BIP62 rule 4).
        const MINIMALDATA = 1 << 6;

        /// Discourage use of NOPs reserved for upgrades (NOP1-10)
        ///
        /// Provided so that nodes can avoid accepting or mining transactions
        /// containing executed NOP's whose meaning may change after a soft-fork,
        /// thus rendering the script invalid; with this flag set executing
        /// discouraged NOPs fails the script. This verification flag will never be
        /// a mandatory flag applied to scripts in a block. NOPs that are not
        /// executed, e.g.  within an unexecuted IF ENDIF block, are *not* rejected.
        const DISCOURAGE_UPGRADABLE_NOPS = 1 << 7;

        /// Require that only a single stack element remains after evaluation. This changes the success criterion from
        /// "At least one stack element must remain, and when interpreted as a boolean, it must be true" to
        /// "Exactly one stack element must remain, and when interpreted as a boolean, it must be true".
        /// (BIP62 rule 6)
        /// Note: CLEANSTACK should never be used without P2SH.
        const CLEANSTACK = 1 << 8;

        /// Verify CHECKLOCKTIMEVERIFY
        ///
        /// See BIP65 for details.
        const CHECKLOCKTIMEVERIFY = 1 << 9;

        /// support CHECKSEQUENCEVERIFY opcode
        ///
        /// See BIP112 for details
        const CHECKSEQUENCEVERIFY = 1 << 10;

        /// The argument of OP_IF/NOTIF must be exactly 0x01 or empty vector.
        const MINIMALIF = 1 << 11;

        /// Signature(s) must be empty vector if a CHECK(MULTI)SIG operation failed.
        const NULLFAIL = 1 << 12;

        /// Signatures carrying the fork id bit are hashed with the fork id
        /// algorithm, signatures without it are rejected. Implies STRICTENC.
        const SIGHASH_FORKID = 1 << 13;

        /// Every signature is hashed with the BIP143 algorithm regardless of
        /// its hash type.
        const BIP143_SIGHASH = 1 << 14;

        /// The output being spent was created after the genesis upgrade.
        const UTXO_AFTER_GENESIS = 1 << 15;

        /// Flags a relaying node applies to transactions spending post-fork outputs.
        const STANDARD = Self::P2SH.bits()
            | Self::STRICTENC.bits()
            | Self::DERSIG.bits()
            | Self::LOW_S.bits()
            | Self::NULLDUMMY.bits()
            | Self::MINIMALDATA.bits()
            | Self::DISCOURAGE_UPGRADABLE_NOPS.bits()
            | Self::CLEANSTACK.bits()
            | Self::CHECKLOCKTIMEVERIFY.bits()
            | Self::CHECKSEQUENCEVERIFY.bits()
            | Self::MINIMALIF.bits()
            | Self::NULLFAIL.bits()
            | Self::SIGHASH_FORKID.bits();
    }
}

impl VerifyFlags {
    pub fn verify_p2sh(&self) -> bool {
        self.contains(Self::P2SH)
    }

    pub fn verify_strictenc(&self) -> bool {
        self.contains(Self::STRICTENC)
    }

    pub fn verify_dersig(&self) -> bool {
        self.contains(Self::DERSIG)
    }

    pub fn verify_low_s(&self) -> bool {
        self.contains(Self::LOW_S)
    }

    pub fn verify_nulldummy(&self) -> bool {
        self.contains(Self::NULLDUMMY)
    }

    pub fn verify_sigpushonly(&self) -> bool {
        self.contains(Self::SIGPUSHONLY)
    }

    pub fn verify_minimaldata(&self) -> bool {
        self.contains(Self::MINIMALDATA)
    }

    pub fn verify_discourage_upgradable_nops(&self) -> bool {
        self.contains(Self::DISCOURAGE_UPGRADABLE_NOPS)
    }

    pub fn verify_cleanstack(&self) -> bool {
        self.contains(Self::CLEANSTACK)
    }

    pub fn verify_locktime(&self) -> bool {
        self.contains(Self::CHECKLOCKTIMEVERIFY)
    }

    pub fn verify_checksequence(&self) -> bool {
        self.contains(Self::CHECKSEQUENCEVERIFY)
    }

    pub fn verify_minimalif(&self) -> bool {
        self.contains(Self::MINIMALIF)
    }

    pub fn verify_nullfail(&self) -> bool {
        self.contains(Self::NULLFAIL)
    }

    pub fn verify_sighash_forkid(&self) -> bool {
        self.contains(Self::SIGHASH_FORKID)
    }

    pub fn verify_bip143_sighash(&self) -> bool {
        self.contains(Self::BIP143_SIGHASH)
    }

    pub fn utxo_after_genesis(&self) -> bool {
        self.contains(Self::UTXO_AFTER_GENESIS)
    }

    /// Whether signatures are checked against strict DER encoding.
    pub fn requires_strict_der(&self) -> bool {
        self.intersects(Self::DERSIG | Self::LOW_S | Self::STRICTENC)
    }
}

/// Verifies that `unlocking` satisfies `locking`.
///
/// - Ok(()): the spend is valid.
/// - Err(err): the spend is invalid, `err` names the reason.
pub fn verify_script(
    unlocking: &Script,
    locking: &Script,
    flags: VerifyFlags,
    checker: &dyn SignatureChecker,
) -> Result<(), Error> {
    Engine::new().execute(ExecutionParams {
        unlocking_script: unlocking,
        locking_script: locking,
        flags,
        checker,
    })
}
