//! robolang evaluator: runs a parsed program one action at a time.
//!
//! Execution state is an explicit frame stack ([`ExecutionState`]), so an
//! [`Interpreter`] can be paused between actions for as long as the host
//! likes (an animation, a user click) and resumed later, with scope
//! variables changed in between.

pub mod error;
pub mod interpreter;
pub mod scope;
pub mod state;
pub mod value;

pub use error::{EvalError, EvalResult};
pub use interpreter::Interpreter;
pub use scope::Scope;
pub use state::{ExecutionState, Frame, FrameKind};
pub use value::Value;
