//! Interpreter: the boundary the lesson layer talks to.
//!
//! Owns the parsed program, the global scope and the execution state, and
//! exposes parse / step / run over them.

use crate::error::{EvalError, EvalResult};
use crate::scope::Scope;
use crate::state::ExecutionState;
use robolang_parser::parse_source;
use robolang_types::ast::Program;
use robolang_types::ParseErrors;
use tracing::debug;

const DEFAULT_SOURCE_NAME: &str = "<input>";

/// A robolang interpreter instance.
///
/// Instances share nothing: each has its own program, scope and state.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    program: Option<Program>,
    state: Option<ExecutionState>,
    scope: Scope,
    gas_limit: Option<u64>,
    source_name: Option<String>,
}

impl Interpreter {
    /// Interpreter with no program, an empty scope and no gas limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpreter whose runs fail with [`EvalError::GasExhausted`] after
    /// `gas_limit` units instead of looping forever.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self {
            gas_limit: Some(gas_limit),
            ..Self::default()
        }
    }

    /// Name used for the source in parse errors.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Parse `source` and install it as the current program.
    ///
    /// On success any previous execution state is discarded and the next
    /// step starts at the top. On failure no program remains loaded, and
    /// the errors come back in the order the parser found them (unclosed
    /// braces innermost first). The global scope is kept either way.
    pub fn parse(&mut self, source: &str) -> Result<(), ParseErrors> {
        let name = self.source_name.as_deref().unwrap_or(DEFAULT_SOURCE_NAME);
        let result = parse_source(name, source);
        self.state = None;

        match result.into_result() {
            Ok(program) => {
                debug!(
                    blocks = program.blocks.len(),
                    actions = program.action_count(),
                    "program parsed"
                );
                self.state = Some(self.fresh_state(&program));
                self.program = Some(program);
                Ok(())
            }
            Err(errors) => {
                debug!(errors = errors.total_errors, "parse failed");
                self.program = None;
                Err(errors)
            }
        }
    }

    pub fn global_scope(&self) -> &Scope {
        &self.scope
    }

    /// Mutable scope; writes are seen by the next condition evaluated.
    pub fn global_scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Execute until the next action and return its letter.
    ///
    /// `Ok(None)` is the termination signal; once returned, further calls
    /// keep returning it until [`Interpreter::reset`] or a new parse.
    pub fn run_until_next_action(&mut self) -> EvalResult<Option<char>> {
        let (Some(program), Some(state)) = (self.program.as_ref(), self.state.as_mut()) else {
            return Err(EvalError::NoProgram);
        };
        state.step(program, &self.scope)
    }

    /// Drain every remaining action from the current position.
    ///
    /// With no gas limit this does not return for a program that loops
    /// forever.
    pub fn run(&mut self) -> EvalResult<Vec<char>> {
        let mut actions = Vec::new();
        while let Some(action) = self.run_until_next_action()? {
            actions.push(action);
        }
        Ok(actions)
    }

    /// Restart the current program from the top. The scope is untouched.
    pub fn reset(&mut self) -> EvalResult<()> {
        let program = self.program.as_ref().ok_or(EvalError::NoProgram)?;
        debug!("execution reset");
        self.state = Some(self.fresh_state(program));
        Ok(())
    }

    /// Whether the termination signal has been returned.
    pub fn is_finished(&self) -> bool {
        self.state.as_ref().is_some_and(ExecutionState::is_finished)
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    pub fn execution_state(&self) -> Option<&ExecutionState> {
        self.state.as_ref()
    }

    /// Resume from a state saved earlier with [`Interpreter::execution_state`].
    ///
    /// Fails with [`EvalError::DanglingBlock`] if the state points at a block
    /// the current program does not have.
    pub fn restore_state(&mut self, state: ExecutionState) -> EvalResult<()> {
        let program = self.program.as_ref().ok_or(EvalError::NoProgram)?;
        if let Some(frame) = state
            .frames()
            .iter()
            .find(|f| program.block(f.block).is_none())
        {
            return Err(EvalError::DanglingBlock(frame.block));
        }
        self.state = Some(state);
        Ok(())
    }

    fn fresh_state(&self, program: &Program) -> ExecutionState {
        match self.gas_limit {
            Some(limit) => ExecutionState::with_gas_limit(program, limit),
            None => ExecutionState::new(program),
        }
    }
}
