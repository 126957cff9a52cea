use super::thread::Thread;
use crate::VerifyFlags;
use crate::debug::Debugger;
use crate::error::Error;
use crate::signature_checker::SignatureChecker;
use bitcoin::Script;
use std::sync::Arc;

/// Inputs of a single script pair execution.
#[derive(Clone, Copy)]
pub struct ExecutionParams<'a> {
    pub unlocking_script: &'a Script,
    pub locking_script: &'a Script,
    pub flags: VerifyFlags,
    pub checker: &'a dyn SignatureChecker,
}

/// Executes script pairs.
///
/// The engine holds no validation state, one engine can run any number of
/// executions, concurrently or not.
#[derive(Default, Clone)]
pub struct Engine {
    debugger: Option<Arc<dyn Debugger>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a debugger notified during every execution.
    pub fn with_debugger(mut self, debugger: Arc<dyn Debugger>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Runs the script pair to completion.
    pub fn execute(&self, params: ExecutionParams<'_>) -> Result<(), Error> {
        let mut thread = Thread::new(&params, self.debugger.clone())?;

        match thread.execute() {
            Ok(()) => {
                thread.notify_success();
                Ok(())
            }
            Err(err) => {
                thread.notify_error(&err);
                Err(err)
            }
        }
    }

    /// Prepares a thread for step by step execution.
    pub fn thread<'a>(&self, params: ExecutionParams<'a>) -> Result<Thread<'a>, Error> {
        Thread::new(&params, self.debugger.clone())
    }
}
