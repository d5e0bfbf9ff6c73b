//! Runtime error types for the robolang evaluator.

use robolang_types::ast::BlockId;
use thiserror::Error;

/// Evaluation error.
///
/// Reading an unset variable is not an error (it reads as `false`), and
/// stepping a finished program keeps returning the termination signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// `run` / `run_until_next_action` called with no successfully parsed program.
    #[error("no program loaded: parse a program successfully before running it")]
    NoProgram,

    /// The configured gas limit was reached.
    #[error("gas exhausted: limit of {0} steps reached")]
    GasExhausted(u64),

    /// A restored execution state names a block the program does not have.
    #[error("execution state refers to missing block {0:?}")]
    DanglingBlock(BlockId),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
