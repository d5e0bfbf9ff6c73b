//! Resumable execution state: the evaluator's call stack made explicit.
//!
//! A native recursive walk would keep one stack frame per nested block,
//! repeat and loop. Here those frames are plain data, so execution can stop
//! right after an action and pick up again on a later call, with no thread
//! or generator held in between.

use crate::error::{EvalError, EvalResult};
use crate::scope::Scope;
use robolang_types::ast::{BlockId, Program, Stmt};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What happens when a frame runs past its last statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// Pop.
    Block,
    /// Restart the body while `remaining > 0`, decrementing it.
    Repeat { remaining: u32 },
    /// Re-read `condition`; restart the body if it holds, else pop.
    Loop { condition: String },
}

/// Progress through one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub block: BlockId,
    /// Index of the next statement to run.
    pub cursor: usize,
    pub kind: FrameKind,
}

impl Frame {
    fn new(block: BlockId, kind: FrameKind) -> Self {
        Self {
            block,
            cursor: 0,
            kind,
        }
    }
}

/// Cursor into a [`Program`].
///
/// Holds no reference to the program or scope; both are passed to
/// [`ExecutionState::step`], so the state can be stored, cloned or
/// serialized independently of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    frames: Vec<Frame>,
    finished: bool,
    /// Statements dispatched plus frames exhausted so far.
    gas_used: u64,
    gas_limit: Option<u64>,
}

impl ExecutionState {
    /// A fresh state positioned before the first statement of `program`.
    pub fn new(program: &Program) -> Self {
        Self {
            frames: vec![Frame::new(program.root, FrameKind::Block)],
            finished: false,
            gas_used: 0,
            gas_limit: None,
        }
    }

    /// Like [`ExecutionState::new`], failing with [`EvalError::GasExhausted`]
    /// once `limit` units have been spent.
    pub fn with_gas_limit(program: &Program, limit: u64) -> Self {
        Self {
            gas_limit: Some(limit),
            ..Self::new(program)
        }
    }

    /// The active frames, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn gas_used(&self) -> u64 {
        self.gas_used
    }

    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    /// Run until the next action and return its letter, or `None` once the
    /// program has terminated. After termination every call returns `None`.
    ///
    /// Conditions are read from `scope` at the moment they are reached, so
    /// changes the caller makes between steps steer what happens next.
    pub fn step(&mut self, program: &Program, scope: &Scope) -> EvalResult<Option<char>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let Some(top) = self.frames.last() else {
                self.finished = true;
                debug!(gas_used = self.gas_used, "program finished");
                return Ok(None);
            };
            let block_id = top.block;
            let cursor = top.cursor;
            let block = program
                .block(block_id)
                .ok_or(EvalError::DanglingBlock(block_id))?;

            let Some(stmt) = block.stmts.get(cursor) else {
                self.exhaust_top(scope)?;
                continue;
            };

            self.tick()?;
            if let Some(frame) = self.frames.last_mut() {
                frame.cursor += 1;
            }

            match stmt {
                Stmt::Action(action) => {
                    trace!(action = %action.letter, "action");
                    return Ok(Some(action.letter));
                }
                Stmt::Block(id) => self.push(Frame::new(*id, FrameKind::Block)),
                Stmt::Repeat(repeat) => {
                    if repeat.count > 0 {
                        self.push(Frame::new(
                            repeat.body,
                            FrameKind::Repeat {
                                remaining: repeat.count - 1,
                            },
                        ));
                    }
                }
                Stmt::Conditional(cond) => {
                    let holds = scope.is_truthy(&cond.condition.name);
                    trace!(condition = %cond.condition.name, holds, "se");
                    let branch = if holds {
                        Some(cond.then_block)
                    } else {
                        cond.else_block
                    };
                    if let Some(id) = branch {
                        self.push(Frame::new(id, FrameKind::Block));
                    }
                }
                Stmt::Loop(lp) => {
                    let holds = scope.is_truthy(&lp.condition.name);
                    trace!(condition = %lp.condition.name, holds, "enquanto");
                    if holds {
                        self.push(Frame::new(
                            lp.body,
                            FrameKind::Loop {
                                condition: lp.condition.name.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    /// Drain every remaining action.
    ///
    /// Does not return while the program keeps looping, unless a gas limit
    /// is set.
    pub fn run(&mut self, program: &Program, scope: &Scope) -> EvalResult<Vec<char>> {
        let mut actions = Vec::new();
        while let Some(action) = self.step(program, scope)? {
            actions.push(action);
        }
        Ok(actions)
    }

    // ── Frame stack ───────────────────────────────────────────────────────

    fn push(&mut self, frame: Frame) {
        trace!(block = frame.block.0, depth = self.frames.len() + 1, "enter");
        self.frames.push(frame);
    }

    /// The top frame ran past its last statement: restart it or pop it.
    fn exhaust_top(&mut self, scope: &Scope) -> EvalResult<()> {
        self.tick()?;
        let depth = self.frames.len();
        let Some(frame) = self.frames.last_mut() else {
            return Ok(());
        };

        let again = match &frame.kind {
            FrameKind::Block => false,
            FrameKind::Repeat { remaining } => *remaining > 0,
            FrameKind::Loop { condition } => scope.is_truthy(condition),
        };

        if again {
            if let FrameKind::Repeat { remaining } = &mut frame.kind {
                *remaining -= 1;
            }
            frame.cursor = 0;
        } else {
            trace!(block = frame.block.0, depth, "exit");
            self.frames.pop();
        }
        Ok(())
    }

    fn tick(&mut self) -> EvalResult<()> {
        self.gas_used += 1;
        match self.gas_limit {
            Some(limit) if self.gas_used > limit => Err(EvalError::GasExhausted(limit)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robolang_parser::parse_source;

    fn program(source: &str) -> Program {
        parse_source("test.robo", source)
            .into_result()
            .expect("clean parse")
    }

    #[test]
    fn test_fresh_state_has_root_frame() {
        let prog = program("R");
        let state = ExecutionState::new(&prog);
        assert_eq!(state.frames().len(), 1);
        assert_eq!(state.frames()[0].block, prog.root);
        assert_eq!(state.frames()[0].cursor, 0);
        assert!(!state.is_finished());
    }

    #[test]
    fn test_frames_mirror_nesting_while_paused() {
        let prog = program("2{ 3{ R } }");
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        assert_eq!(state.step(&prog, &scope), Ok(Some('R')));

        let kinds: Vec<_> = state.frames().iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                FrameKind::Block,
                FrameKind::Repeat { remaining: 1 },
                FrameKind::Repeat { remaining: 2 },
            ]
        );
    }

    #[test]
    fn test_repeat_reentry_resets_cursor() {
        let prog = program("2{ A B }");
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        assert_eq!(state.step(&prog, &scope), Ok(Some('A')));
        assert_eq!(state.step(&prog, &scope), Ok(Some('B')));
        assert_eq!(state.frames()[1].cursor, 2);
        assert_eq!(state.step(&prog, &scope), Ok(Some('A')));
        assert_eq!(state.frames()[1].cursor, 1);
        assert_eq!(state.frames()[1].kind, FrameKind::Repeat { remaining: 0 });
    }

    #[test]
    fn test_loop_frame_remembers_condition() {
        let prog = program("enquanto livre { F }");
        let mut scope = Scope::new();
        scope.set("livre", true);
        let mut state = ExecutionState::new(&prog);
        assert_eq!(state.step(&prog, &scope), Ok(Some('F')));
        assert_eq!(
            state.frames()[1].kind,
            FrameKind::Loop {
                condition: "livre".into()
            }
        );
    }

    #[test]
    fn test_finished_state_is_idempotent() {
        let prog = program("");
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        for _ in 0..5 {
            assert_eq!(state.step(&prog, &scope), Ok(None));
        }
        assert!(state.is_finished());
        assert!(state.frames().is_empty());
    }

    #[test]
    fn test_deep_nesting_lives_on_the_frame_stack() {
        let depth = 50_000;
        let source = format!("{}R{}", "{".repeat(depth), "}".repeat(depth));
        let prog = program(&source);
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        assert_eq!(state.step(&prog, &scope), Ok(Some('R')));
        assert_eq!(state.frames().len(), depth + 1);
        assert_eq!(state.step(&prog, &scope), Ok(None));
        assert!(state.frames().is_empty());
    }

    #[test]
    fn test_gas_counts_dispatches_and_exits() {
        // 2 actions dispatched + root exhausted once
        let prog = program("A B");
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        assert_eq!(state.run(&prog, &scope), Ok(vec!['A', 'B']));
        assert_eq!(state.gas_used(), 3);
    }

    #[test]
    fn test_gas_limit_stops_empty_infinite_loop() {
        let prog = program("enquanto x { }");
        let mut scope = Scope::new();
        scope.set("x", true);
        let mut state = ExecutionState::with_gas_limit(&prog, 100);
        assert_eq!(state.step(&prog, &scope), Err(EvalError::GasExhausted(100)));
        assert_eq!(state.gas_limit(), Some(100));
    }

    #[test]
    fn test_dangling_block_is_reported() {
        let prog = program("R");
        let mut state = ExecutionState::new(&prog);
        state.frames[0].block = BlockId(99);
        assert_eq!(
            state.step(&prog, &Scope::new()),
            Err(EvalError::DanglingBlock(BlockId(99)))
        );
    }

    #[test]
    fn test_state_serializes_mid_run() {
        let prog = program("3{ R L }");
        let scope = Scope::new();
        let mut state = ExecutionState::new(&prog);
        state.step(&prog, &scope).unwrap();
        state.step(&prog, &scope).unwrap();
        state.step(&prog, &scope).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: ExecutionState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.run(&prog, &scope), Ok(vec!['L', 'R', 'L']));
        assert_eq!(state.run(&prog, &scope), Ok(vec!['L', 'R', 'L']));
    }
}
