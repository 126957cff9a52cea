use super::engine::ExecutionParams;
use crate::config::Config;
use crate::debug::Debugger;
use crate::error::Error;
use crate::opcode::{OP_PUSHDATA4, OP_RETURN};
use crate::parser::{ParsedOpcode, ParsedScript};
use crate::signature_checker::SignatureChecker;
use crate::stack::Stack;
use crate::VerifyFlags;
use std::sync::Arc;

const LOG_TARGET: &str = "sv_script::thread";

/// State of an open conditional block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The current branch is not executed.
    False,
    /// The current branch is executed.
    True,
    /// The whole block is nested in a branch that is not executed.
    Skip,
}

/// A snapshot of the execution state of a [`Thread`].
///
/// Every field is an owned copy, mutating a snapshot never affects the
/// thread it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub data_stack: Vec<Vec<u8>>,
    pub alt_stack: Vec<Vec<u8>>,
    pub else_stack: Vec<bool>,
    pub cond_stack: Vec<Condition>,
    pub saved_first_stack: Vec<Vec<u8>>,
    pub scripts: Vec<ParsedScript>,
    pub script_idx: usize,
    pub script_off: usize,
    pub begin_code: usize,
    pub num_ops: usize,
    pub after_genesis: bool,
    pub early_return_after_genesis: bool,
}

impl State {
    /// The opcode the program counter points to, if any.
    pub fn opcode(&self) -> Option<&ParsedOpcode> {
        self.scripts.get(self.script_idx)?.get(self.script_off)
    }
}

/// The virtual machine executing one unlocking/locking script pair.
pub struct Thread<'a> {
    pub(crate) dstack: Stack,
    pub(crate) astack: Stack,
    pub(crate) else_stack: Vec<bool>,
    pub(crate) cond_stack: Vec<Condition>,
    saved_first_stack: Vec<Vec<u8>>,
    scripts: Vec<Arc<ParsedScript>>,
    script_idx: usize,
    script_off: usize,
    /// Offset in the current script right after the last executed
    /// OP_CODESEPARATOR.
    pub(crate) begin_code: usize,
    pub(crate) num_ops: usize,
    pub(crate) flags: VerifyFlags,
    pub(crate) config: Config,
    bip16: bool,
    pub(crate) after_genesis: bool,
    pub(crate) early_return_after_genesis: bool,
    /// Set by a post-genesis OP_RETURN outside of any conditional block, the
    /// rest of the current script is skipped.
    pub(crate) pending_return: bool,
    pub(crate) checker: &'a dyn SignatureChecker,
    debugger: Option<Arc<dyn Debugger>>,
}

impl std::fmt::Debug for Thread<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread")
            .field("dstack", &self.dstack)
            .field("astack", &self.astack)
            .field("cond_stack", &self.cond_stack)
            .field("script_idx", &self.script_idx)
            .field("script_off", &self.script_off)
            .field("num_ops", &self.num_ops)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl<'a> Thread<'a> {
    /// Prepares the execution of a script pair.
    ///
    /// A setup failure is reported to the debugger with an empty state.
    pub fn new(
        params: &ExecutionParams<'a>,
        debugger: Option<Arc<dyn Debugger>>,
    ) -> Result<Self, Error> {
        Self::setup(params, debugger.clone()).inspect_err(|err| {
            if let Some(debugger) = &debugger {
                debugger.after_error(&State::default(), err);
            }
        })
    }

    fn setup(
        params: &ExecutionParams<'a>,
        debugger: Option<Arc<dyn Debugger>>,
    ) -> Result<Self, Error> {
        let unlocking = params.unlocking_script;
        let locking = params.locking_script;

        // Nothing would ever be pushed, the result is known upfront.
        if unlocking.is_empty() && locking.is_empty() {
            return Err(Error::EvalFalse);
        }

        let mut flags = params.flags;

        if flags.verify_sighash_forkid() {
            flags |= VerifyFlags::STRICTENC;
        }

        if flags.verify_cleanstack() && !flags.verify_p2sh() {
            return Err(Error::InvalidFlags);
        }

        let after_genesis = flags.utxo_after_genesis();
        let config = Config::new(after_genesis);

        for script in [unlocking, locking] {
            if script.len() > config.max_script_size {
                return Err(Error::ScriptTooBig {
                    size: script.len(),
                    max: config.max_script_size,
                });
            }
        }

        let unlocking_ops = ParsedScript::parse(unlocking.as_bytes())?;
        let locking_ops = ParsedScript::parse(locking.as_bytes())?;

        if flags.verify_sigpushonly() && !unlocking_ops.is_push_only() {
            return Err(Error::SigPushOnly);
        }

        let bip16 = flags.verify_p2sh() && locking.is_p2sh();

        // Only accept input scripts that push data for P2SH.
        if bip16 && !unlocking_ops.is_push_only() {
            return Err(Error::SigPushOnly);
        }

        let verify_minimaldata = flags.verify_minimaldata();
        let mut dstack = Stack::new(config.max_num_len, verify_minimaldata, after_genesis);
        dstack.set_debugger(debugger.clone());
        let astack = Stack::new(config.max_num_len, verify_minimaldata, after_genesis);

        let script_idx = if unlocking_ops.is_empty() { 1 } else { 0 };

        tracing::debug!(
            target: LOG_TARGET,
            "Prepared script pair, unlocking: {unlocking_ops}, locking: {locking_ops}, flags: {flags:?}"
        );

        Ok(Self {
            dstack,
            astack,
            else_stack: Vec::new(),
            cond_stack: Vec::new(),
            saved_first_stack: Vec::new(),
            scripts: vec![Arc::new(unlocking_ops), Arc::new(locking_ops)],
            script_idx,
            script_off: 0,
            begin_code: 0,
            num_ops: 0,
            flags,
            config,
            bip16,
            after_genesis,
            early_return_after_genesis: false,
            pending_return: false,
            checker: params.checker,
            debugger,
        })
    }

    /// Executes every remaining opcode and checks the final stack.
    pub fn execute(&mut self) -> Result<(), Error> {
        self.notify(|debugger, state| debugger.before_execute(state));

        let result = self.run();

        self.notify(|debugger, state| debugger.after_execute(state));

        result?;

        self.check_error_condition(true)
    }

    fn run(&mut self) -> Result<(), Error> {
        loop {
            self.notify(|debugger, state| debugger.before_step(state));

            let done = self.step()?;

            self.notify(|debugger, state| debugger.after_step(state));

            if done {
                return Ok(());
            }
        }
    }

    /// Executes the opcode at the program counter.
    ///
    /// Returns `Ok(true)` once every script has been executed.
    pub fn step(&mut self) -> Result<bool, Error> {
        let script = self.current_script()?;
        let op = &script[self.script_off];

        self.notify(|debugger, state| debugger.before_execute_opcode(state));

        self.execute_opcode(op)?;

        if self.pending_return {
            self.pending_return = false;
            tracing::debug!(target: LOG_TARGET, "Early return in script #{}", self.script_idx);
            self.shift_script()?;
            return Ok(self.is_done());
        }

        self.notify(|debugger, state| debugger.after_execute_opcode(state));

        let combined_size = self.dstack.len() + self.astack.len();
        if combined_size > self.config.max_stack_size {
            return Err(Error::StackOverflow {
                size: combined_size,
                max: self.config.max_stack_size,
            });
        }

        self.script_off += 1;

        if self.script_off >= script.len() {
            // Illegal to have an IF that straddles two scripts.
            if !self.cond_stack.is_empty() {
                return Err(Error::UnbalancedConditional);
            }

            self.shift_script()?;
        }

        Ok(self.is_done())
    }

    /// Moves the program counter to the start of the next script.
    fn shift_script(&mut self) -> Result<(), Error> {
        self.notify(|debugger, state| debugger.before_script_change(state));

        // The alt stack doesn't persist across scripts.
        self.astack.clear();
        self.num_ops = 0;
        self.script_off = 0;
        self.begin_code = 0;
        self.early_return_after_genesis = false;

        if self.bip16 && self.script_idx == 0 {
            self.script_idx += 1;
            self.saved_first_stack = self.dstack.to_vec();
        } else if self.bip16 && self.script_idx == 1 && !self.after_genesis {
            // Put us past the end for check_error_condition().
            self.script_idx += 1;

            // The locking script must have run successfully before the
            // redeem script is extracted from the unlocking stack.
            self.check_error_condition(false)?;

            let (redeem_script, stack) = self
                .saved_first_stack
                .split_last()
                .ok_or(Error::EmptyStack)?;
            let redeem_script = ParsedScript::parse(redeem_script)?;

            tracing::debug!(target: LOG_TARGET, "Executing redeem script: {redeem_script}");

            self.scripts.push(Arc::new(redeem_script));
            self.dstack.set_data(stack.to_vec());
        } else {
            self.script_idx += 1;
        }

        // There are zero length scripts in the wild.
        if self
            .scripts
            .get(self.script_idx)
            .is_some_and(|script| script.is_empty())
        {
            self.script_idx += 1;
        }

        self.notify(|debugger, state| debugger.after_script_change(state));

        Ok(())
    }

    fn execute_opcode(&mut self, op: &ParsedOpcode) -> Result<(), Error> {
        let opcode = op.opcode;
        let exec = self.should_exec(op);

        if opcode.is_disabled() && (!self.after_genesis || exec) {
            return Err(Error::DisabledOpcode(opcode.name));
        }

        if opcode.is_always_illegal() && !self.after_genesis {
            return Err(Error::ReservedOpcode(opcode.name));
        }

        // Applies to the data captured after a terminating OP_RETURN too.
        if op.data.len() > self.config.max_element_size {
            return Err(Error::ElementTooBig {
                size: op.data.len(),
                max: self.config.max_element_size,
            });
        }

        // OP_RESERVED counts as a push and not towards the operation limit.
        if opcode.counts_as_operation() {
            self.num_ops += 1;
            if self.num_ops > self.config.max_ops {
                return Err(Error::TooManyOperations(self.config.max_ops));
            }
        }

        let branch_executing = self.is_branch_executing();

        if !branch_executing && !opcode.is_conditional() {
            return Ok(());
        }

        if self.dstack.verify_minimaldata()
            && branch_executing
            && exec
            && opcode.value <= OP_PUSHDATA4
        {
            op.enforce_minimum_data_push()?;
        }

        // After an early return only conditionals run, to keep checking the
        // balance of IF/ENDIF.
        if !exec && !opcode.is_conditional() {
            return Ok(());
        }

        tracing::trace!(
            target: LOG_TARGET,
            "Executing {op:?} at {}:{}, stack: {}",
            self.script_idx,
            self.script_off,
            self.dstack
        );

        (opcode.exec)(op, self)
    }

    /// Whether opcodes run under the post-genesis early return and
    /// conditional rules.
    pub(crate) fn should_exec(&self, op: &ParsedOpcode) -> bool {
        if !self.after_genesis {
            return true;
        }

        let all_true = self.cond_stack.iter().all(|c| *c != Condition::False);

        all_true && (!self.early_return_after_genesis || op.value() == OP_RETURN)
    }

    /// Whether the innermost conditional branch is executed.
    pub(crate) fn is_branch_executing(&self) -> bool {
        self.cond_stack
            .last()
            .is_none_or(|cond| *cond == Condition::True)
    }

    /// Checks the final state of a script.
    ///
    /// `final_script` is set when every script is expected to have run.
    pub fn check_error_condition(&mut self, final_script: bool) -> Result<(), Error> {
        if final_script && !self.is_done() {
            return Err(Error::ScriptUnfinished);
        }

        if self.dstack.is_empty() {
            return Err(Error::EmptyStack);
        }

        if final_script && self.flags.verify_cleanstack() && self.dstack.len() != 1 {
            return Err(Error::CleanStack(self.dstack.len()));
        }

        let success = self.dstack.pop_bool()?;

        tracing::debug!(target: LOG_TARGET, "Script finished, success: {success}");

        if success {
            Ok(())
        } else {
            Err(Error::EvalFalse)
        }
    }

    fn current_script(&self) -> Result<Arc<ParsedScript>, Error> {
        let invalid = || Error::InvalidProgramCounter {
            script_idx: self.script_idx,
            script_off: self.script_off,
        };

        let script = self.scripts.get(self.script_idx).ok_or_else(invalid)?;

        if self.script_off >= script.len() {
            return Err(invalid());
        }

        Ok(Arc::clone(script))
    }

    /// Whether every script has been executed.
    pub fn is_done(&self) -> bool {
        self.script_idx >= self.scripts.len()
    }

    /// The script code signatures commit to: the current script from the
    /// last executed OP_CODESEPARATOR on.
    pub(crate) fn sub_script(&self) -> ParsedScript {
        self.scripts
            .get(self.script_idx)
            .and_then(|script| script.get(self.begin_code..))
            .map(|ops| ParsedScript::from(ops.to_vec()))
            .unwrap_or_default()
    }

    pub(crate) fn script_off(&self) -> usize {
        self.script_off
    }

    pub fn data_stack(&self) -> &Stack {
        &self.dstack
    }

    pub fn alt_stack(&self) -> &Stack {
        &self.astack
    }

    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a deep copy of the execution state.
    pub fn state(&self) -> State {
        State {
            data_stack: self.dstack.to_vec(),
            alt_stack: self.astack.to_vec(),
            else_stack: self.else_stack.clone(),
            cond_stack: self.cond_stack.clone(),
            saved_first_stack: self.saved_first_stack.clone(),
            scripts: self.scripts.iter().map(|s| ParsedScript::clone(s)).collect(),
            script_idx: self.script_idx,
            script_off: self.script_off,
            begin_code: self.begin_code,
            num_ops: self.num_ops,
            after_genesis: self.after_genesis,
            early_return_after_genesis: self.early_return_after_genesis,
        }
    }

    /// Restores the execution state from a snapshot.
    pub fn set_state(&mut self, state: &State) {
        self.dstack.set_data(state.data_stack.clone());
        self.astack.set_data(state.alt_stack.clone());
        self.else_stack = state.else_stack.clone();
        self.cond_stack = state.cond_stack.clone();
        self.saved_first_stack = state.saved_first_stack.clone();
        self.scripts = state.scripts.iter().cloned().map(Arc::new).collect();
        self.script_idx = state.script_idx;
        self.script_off = state.script_off;
        self.begin_code = state.begin_code;
        self.num_ops = state.num_ops;
        self.after_genesis = state.after_genesis;
        self.config = Config::new(state.after_genesis);
        self.early_return_after_genesis = state.early_return_after_genesis;
        self.pending_return = false;
    }

    fn notify(&self, hook: impl FnOnce(&dyn Debugger, &State)) {
        if let Some(debugger) = &self.debugger {
            hook(debugger.as_ref(), &self.state());
        }
    }

    pub(crate) fn notify_error(&self, err: &Error) {
        self.notify(|debugger, state| debugger.after_error(state, err));
    }

    pub(crate) fn notify_success(&self) {
        self.notify(|debugger, state| debugger.after_success(state));
    }
}
