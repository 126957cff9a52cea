mod engine;
pub(crate) mod ops;
mod thread;

pub use self::engine::{Engine, ExecutionParams};
pub use self::ops::{CheckMultiSigError, CheckSigError, SignatureEncodingError};
pub use self::thread::{Condition, State, Thread};
