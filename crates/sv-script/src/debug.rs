//! Execution observers.
//!
//! A [`Debugger`] attached to an [`Engine`](crate::Engine) is notified around
//! every execution phase. Hooks receive copies of the execution state, so an
//! observer can never influence the verdict.

use crate::error::Error;
use crate::interpreter::State;

/// Observer of a script execution.
///
/// Every hook defaults to a no-op.
pub trait Debugger: Send + Sync {
    fn before_execute(&self, _state: &State) {}

    fn after_execute(&self, _state: &State) {}

    fn before_step(&self, _state: &State) {}

    fn after_step(&self, _state: &State) {}

    fn before_execute_opcode(&self, _state: &State) {}

    fn after_execute_opcode(&self, _state: &State) {}

    fn before_script_change(&self, _state: &State) {}

    fn after_script_change(&self, _state: &State) {}

    fn after_success(&self, _state: &State) {}

    fn after_error(&self, _state: &State, _err: &Error) {}

    /// Called with the data stack before `data` is pushed onto it.
    fn before_stack_push(&self, _stack: &[Vec<u8>], _data: &[u8]) {}

    fn after_stack_push(&self, _stack: &[Vec<u8>]) {}

    fn before_stack_pop(&self, _stack: &[Vec<u8>]) {}

    /// Called with the data stack after `data` was popped from it.
    fn after_stack_pop(&self, _stack: &[Vec<u8>], _data: &[u8]) {}
}

/// A debugger that observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopDebugger;

impl Debugger for NopDebugger {}

type StateFn = Box<dyn Fn(&State) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&State, &Error) + Send + Sync>;
type StackFn = Box<dyn Fn(&[Vec<u8>]) + Send + Sync>;
type StackDataFn = Box<dyn Fn(&[Vec<u8>], &[u8]) + Send + Sync>;

/// A debugger dispatching every hook to the callbacks registered for it.
///
/// Callbacks of the same hook run in registration order.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use sv_script::CallbackDebugger;
///
/// let steps = Arc::new(Mutex::new(0));
/// let counter = steps.clone();
/// let debugger = CallbackDebugger::new().on_after_step(move |_| *counter.lock().unwrap() += 1);
/// # let _ = debugger;
/// ```
#[derive(Default)]
pub struct CallbackDebugger {
    before_execute: Vec<StateFn>,
    after_execute: Vec<StateFn>,
    before_step: Vec<StateFn>,
    after_step: Vec<StateFn>,
    before_execute_opcode: Vec<StateFn>,
    after_execute_opcode: Vec<StateFn>,
    before_script_change: Vec<StateFn>,
    after_script_change: Vec<StateFn>,
    after_success: Vec<StateFn>,
    after_error: Vec<ErrorFn>,
    before_stack_push: Vec<StackDataFn>,
    after_stack_push: Vec<StackFn>,
    before_stack_pop: Vec<StackFn>,
    after_stack_pop: Vec<StackDataFn>,
}

macro_rules! register_state_hooks {
    ($($hook:ident => $field:ident),* $(,)?) => {
        $(
            pub fn $hook(mut self, f: impl Fn(&State) + Send + Sync + 'static) -> Self {
                self.$field.push(Box::new(f));
                self
            }
        )*
    };
}

impl CallbackDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    register_state_hooks! {
        on_before_execute => before_execute,
        on_after_execute => after_execute,
        on_before_step => before_step,
        on_after_step => after_step,
        on_before_execute_opcode => before_execute_opcode,
        on_after_execute_opcode => after_execute_opcode,
        on_before_script_change => before_script_change,
        on_after_script_change => after_script_change,
        on_after_success => after_success,
    }

    pub fn on_after_error(mut self, f: impl Fn(&State, &Error) + Send + Sync + 'static) -> Self {
        self.after_error.push(Box::new(f));
        self
    }

    pub fn on_before_stack_push(
        mut self,
        f: impl Fn(&[Vec<u8>], &[u8]) + Send + Sync + 'static,
    ) -> Self {
        self.before_stack_push.push(Box::new(f));
        self
    }

    pub fn on_after_stack_push(mut self, f: impl Fn(&[Vec<u8>]) + Send + Sync + 'static) -> Self {
        self.after_stack_push.push(Box::new(f));
        self
    }

    pub fn on_before_stack_pop(mut self, f: impl Fn(&[Vec<u8>]) + Send + Sync + 'static) -> Self {
        self.before_stack_pop.push(Box::new(f));
        self
    }

    pub fn on_after_stack_pop(
        mut self,
        f: impl Fn(&[Vec<u8>], &[u8]) + Send + Sync + 'static,
    ) -> Self {
        self.after_stack_pop.push(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CallbackDebugger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDebugger").finish_non_exhaustive()
    }
}

impl Debugger for CallbackDebugger {
    fn before_execute(&self, state: &State) {
        self.before_execute.iter().for_each(|f| f(state));
    }

    fn after_execute(&self, state: &State) {
        self.after_execute.iter().for_each(|f| f(state));
    }

    fn before_step(&self, state: &State) {
        self.before_step.iter().for_each(|f| f(state));
    }

    fn after_step(&self, state: &State) {
        self.after_step.iter().for_each(|f| f(state));
    }

    fn before_execute_opcode(&self, state: &State) {
        self.before_execute_opcode.iter().for_each(|f| f(state));
    }

    fn after_execute_opcode(&self, state: &State) {
        self.after_execute_opcode.iter().for_each(|f| f(state));
    }

    fn before_script_change(&self, state: &State) {
        self.before_script_change.iter().for_each(|f| f(state));
    }

    fn after_script_change(&self, state: &State) {
        self.after_script_change.iter().for_each(|f| f(state));
    }

    fn after_success(&self, state: &State) {
        self.after_success.iter().for_each(|f| f(state));
    }

    fn after_error(&self, state: &State, err: &Error) {
        self.after_error.iter().for_each(|f| f(state, err));
    }

    fn before_stack_push(&self, stack: &[Vec<u8>], data: &[u8]) {
        self.before_stack_push.iter().for_each(|f| f(stack, data));
    }

    fn after_stack_push(&self, stack: &[Vec<u8>]) {
        self.after_stack_push.iter().for_each(|f| f(stack));
    }

    fn before_stack_pop(&self, stack: &[Vec<u8>]) {
        self.before_stack_pop.iter().for_each(|f| f(stack));
    }

    fn after_stack_pop(&self, stack: &[Vec<u8>], data: &[u8]) {
        self.after_stack_pop.iter().for_each(|f| f(stack, data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let (first, second) = (calls.clone(), calls.clone());
        let debugger = CallbackDebugger::new()
            .on_before_step(move |_| first.lock().unwrap().push(1))
            .on_before_step(move |_| second.lock().unwrap().push(2));

        debugger.before_step(&State::default());
        debugger.after_step(&State::default());
        debugger.before_step(&State::default());

        assert_eq!(*calls.lock().unwrap(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_stack_callbacks_receive_data() {
        let pushed = Arc::new(Mutex::new(Vec::new()));
        let recorder = pushed.clone();
        let debugger = CallbackDebugger::new().on_before_stack_push(move |stack, data| {
            recorder.lock().unwrap().push((stack.len(), data.to_vec()))
        });

        debugger.before_stack_push(&[vec![1]], &[2, 3]);
        debugger.after_stack_pop(&[], &[9]);

        assert_eq!(*pushed.lock().unwrap(), vec![(1, vec![2, 3])]);
    }
}
