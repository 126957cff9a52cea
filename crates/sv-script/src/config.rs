//! Execution limits selected by the genesis upgrade.

use crate::VerifyFlags;

/// Limits applied to a single script-pair execution.
///
/// Two presets exist, one for outputs created before the genesis upgrade and
/// one for outputs created after it. All consensus limits that differ across
/// the upgrade live here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of non-push operations per script.
    pub max_ops: usize,
    /// Maximum combined depth of the data and alt stacks.
    pub max_stack_size: usize,
    /// Maximum size of the unlocking and locking script, in bytes.
    pub max_script_size: usize,
    /// Maximum size of a single stack element, in bytes.
    pub max_element_size: usize,
    /// Maximum size of a numeric operand, in bytes.
    pub max_num_len: usize,
    /// Maximum number of public keys per multisig.
    pub max_pubkeys_per_multisig: usize,
}

impl Config {
    pub const BEFORE_GENESIS: Self = Self {
        max_ops: 500,
        max_stack_size: 1000,
        max_script_size: 10_000,
        max_element_size: 520,
        max_num_len: 4,
        max_pubkeys_per_multisig: 20,
    };

    pub const AFTER_GENESIS: Self = Self {
        max_ops: i32::MAX as usize,
        max_stack_size: i32::MAX as usize,
        max_script_size: i32::MAX as usize,
        max_element_size: i32::MAX as usize,
        max_num_len: 750 * 1000,
        max_pubkeys_per_multisig: i32::MAX as usize,
    };

    /// Returns the preset matching `after_genesis`.
    pub const fn new(after_genesis: bool) -> Self {
        if after_genesis {
            Self::AFTER_GENESIS
        } else {
            Self::BEFORE_GENESIS
        }
    }

    /// Returns the preset selected by [`VerifyFlags::UTXO_AFTER_GENESIS`].
    pub fn for_flags(flags: VerifyFlags) -> Self {
        Self::new(flags.utxo_after_genesis())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::BEFORE_GENESIS
    }
}
