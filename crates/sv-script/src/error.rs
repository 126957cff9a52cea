use crate::interpreter::{CheckMultiSigError, CheckSigError};
use crate::num::NumError;
use crate::stack::StackError;

/// Script error type.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    ///////////////////////////
    // Script outcome.
    ///////////////////////////
    /// The script evaluated without error but terminated with a false top
    /// stack element.
    #[error("script terminated with a false stack element")]
    EvalFalse,
    /// The script evaluated to an empty stack.
    #[error("stack empty at end of script execution")]
    EmptyStack,
    /// CLEANSTACK is set and more than one element remains on the stack
    /// after evaluation.
    #[error("stack contains {0} unexpected items")]
    CleanStack(usize),
    /// The final result was requested before every script was executed.
    #[error("error check when script unfinished")]
    ScriptUnfinished,
    /// OP_RETURN executed before the genesis upgrade.
    #[error("script returned early")]
    EarlyReturn,

    ///////////////////////////
    // Setup.
    ///////////////////////////
    /// CLEANSTACK without P2SH.
    #[error("invalid flag combination")]
    InvalidFlags,
    #[error("script size {size} is larger than the max allowed size {max}")]
    ScriptTooBig { size: usize, max: usize },
    /// The unlocking script contains a non-push opcode while SIGPUSHONLY is
    /// set, or while spending a pay-to-script-hash output.
    #[error("signature script is not push only")]
    SigPushOnly,
    #[error("program counter {script_idx}:{script_off} is out of range")]
    InvalidProgramCounter { script_idx: usize, script_off: usize },
    #[error("input index {index} is out of range for a transaction with {inputs} inputs")]
    InputIndexOutOfRange { index: usize, inputs: usize },

    ///////////////////////////
    // Parsing.
    ///////////////////////////
    #[error("malformed push: {0}")]
    MalformedPush(bitcoin::script::Error),
    /// A parsed opcode carries data that its encoding cannot express.
    #[error("{opcode} carries {len} bytes of data that its encoding cannot represent")]
    InvalidPushLength { opcode: &'static str, len: usize },
    /// MINIMALDATA is set and a push did not use the smallest encoding.
    #[error("data push with {opcode} is not minimally encoded")]
    MinimalData { opcode: &'static str },

    ///////////////////////////
    // Limits.
    ///////////////////////////
    #[error("element size {size} exceeds the max allowed size {max}")]
    ElementTooBig { size: usize, max: usize },
    #[error("exceeded max operation limit of {0}")]
    TooManyOperations(usize),
    /// Stack and altstack combined depth is over the limit.
    #[error("combined stack size {size} exceeds the max allowed size {max}")]
    StackOverflow { size: usize, max: usize },

    ///////////////////////////
    // Opcode legality.
    ///////////////////////////
    #[error("attempt to execute disabled opcode {0}")]
    DisabledOpcode(&'static str),
    #[error("attempt to execute reserved opcode {0}")]
    ReservedOpcode(&'static str),
    #[error("attempt to execute invalid opcode {0}")]
    InvalidOpcode(&'static str),
    #[error("{0} executed while DISCOURAGE_UPGRADABLE_NOPS is set")]
    DiscourageUpgradableNops(&'static str),

    ///////////////////////////
    // Conditionals.
    ///////////////////////////
    /// OP_ELSE or OP_ENDIF without an open OP_IF, a second OP_ELSE after
    /// genesis, or a script ending inside a conditional block.
    #[error("unbalanced conditional")]
    UnbalancedConditional,
    /// MINIMALIF is set and the operand of OP_IF/OP_NOTIF is neither empty
    /// nor `[0x01]`.
    #[error("conditional operand is not a minimal boolean")]
    MinimalIf,

    ///////////////////////////
    // Failed verify operations.
    ///////////////////////////
    #[error("OP_VERIFY failed")]
    Verify,
    #[error("OP_EQUALVERIFY failed")]
    EqualVerify,
    #[error("OP_NUMEQUALVERIFY failed")]
    NumEqualVerify,
    #[error("OP_CHECKSIGVERIFY failed")]
    CheckSigVerify,
    #[error("OP_CHECKMULTISIGVERIFY failed")]
    CheckMultiSigVerify,

    ///////////////////////////
    // Splice and bitwise operands.
    ///////////////////////////
    #[error("number too big: {0}")]
    NumberTooBig(&'static str),
    #[error("number too small: {0}")]
    NumberTooSmall(&'static str),
    #[error("operands of {0} have different lengths")]
    InvalidInputLength(&'static str),

    ///////////////////////////
    // CHECKLOCKTIMEVERIFY and CHECKSEQUENCEVERIFY
    ///////////////////////////
    #[error("negative lock time")]
    NegativeLockTime,
    /// The required lock time has not been reached.
    #[error("unsatisfied lock time")]
    UnsatisfiedLockTime,

    ///////////////////////////
    // Nested.
    ///////////////////////////
    #[error("invalid alt stack operation")]
    InvalidAltStackOperation,
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error(transparent)]
    Num(#[from] NumError),
    #[error(transparent)]
    CheckSig(#[from] CheckSigError),
    #[error(transparent)]
    CheckMultiSig(#[from] CheckMultiSigError),
}
