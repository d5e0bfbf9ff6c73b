//! robolang interpreter as a WASM module for browser lessons.
//!
//! This crate exposes the robolang [`Interpreter`] via `wasm-bindgen`. Every
//! result crosses the boundary as a JSON string, so the lesson layer only
//! needs `JSON.parse`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { RobolangInterpreter } from 'robolang-wasm';
//!
//! await init();
//!
//! const robot = new RobolangInterpreter();
//! JSON.parse(robot.parse("A B enquanto livre { F } R"));   // null
//! robot.set_variable("livre", true);
//! JSON.parse(robot.step());                                 // { action: "A" }
//! ```

use robolang_eval::Interpreter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct ActionReply {
    action: Option<char>,
}

#[derive(Serialize)]
struct RunReply {
    actions: Vec<char>,
}

#[derive(Serialize)]
struct ErrorReply {
    error: String,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"error":"Serialization error: {}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

fn error_json(error: impl ToString) -> String {
    to_json(&ErrorReply {
        error: error.to_string(),
    })
}

/// One interpreter per lesson run.
#[wasm_bindgen]
pub struct RobolangInterpreter {
    inner: Interpreter,
}

#[wasm_bindgen]
impl RobolangInterpreter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Interpreter::new().with_source_name("lesson.robo"),
        }
    }

    /// Interpreter that reports `{"error": ...}` instead of hanging once a
    /// run has spent `limit` steps.
    pub fn with_gas_limit(limit: u32) -> Self {
        Self {
            inner: Interpreter::with_gas_limit(u64::from(limit)).with_source_name("lesson.robo"),
        }
    }

    /// Load a program.
    ///
    /// Returns `null` on success, otherwise the structured error list:
    /// ```json
    /// { "errors": [{ "code": 101, "message": "unclosed '{'", "line": 1, ... }], "total_errors": 1 }
    /// ```
    pub fn parse(&mut self, source: &str) -> String {
        match self.inner.parse(source) {
            Ok(()) => "null".to_string(),
            Err(errors) => to_json(&errors),
        }
    }

    pub fn set_variable(&mut self, name: &str, value: bool) {
        self.inner.global_scope_mut().set(name, value);
    }

    /// Truthiness of a scope variable; unset reads as `false`.
    pub fn get_variable(&self, name: &str) -> bool {
        self.inner.global_scope().is_truthy(name)
    }

    /// Run to the next action: `{"action":"R"}`, `{"action":null}` once the
    /// program is over, or `{"error":"..."}`.
    pub fn step(&mut self) -> String {
        match self.inner.run_until_next_action() {
            Ok(action) => to_json(&ActionReply { action }),
            Err(e) => error_json(e),
        }
    }

    /// Drain the program: `{"actions":["R","L"]}` or `{"error":"..."}`.
    pub fn run(&mut self) -> String {
        match self.inner.run() {
            Ok(actions) => to_json(&RunReply { actions }),
            Err(e) => error_json(e),
        }
    }

    /// Restart the loaded program; `null` or `{"error":"..."}`.
    pub fn reset(&mut self) -> String {
        match self.inner.reset() {
            Ok(()) => "null".to_string(),
            Err(e) => error_json(e),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Default for RobolangInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Report the parse errors of `source` without loading it anywhere.
///
/// Returns the same JSON as [`RobolangInterpreter::parse`], which suits
/// editor diagnostics while the learner types.
#[wasm_bindgen]
pub fn check(source: &str, filename: &str) -> String {
    match robolang_parser::parse_source(filename, source).into_result() {
        Ok(_) => "null".to_string(),
        Err(errors) => to_json(&errors),
    }
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parsed(s: &str) -> Value {
        serde_json::from_str(s).expect("valid JSON")
    }

    #[test]
    fn test_parse_success_is_null() {
        let mut robot = RobolangInterpreter::new();
        assert_eq!(robot.parse("2{ R }"), "null");
    }

    #[test]
    fn test_parse_failure_lists_errors() {
        let mut robot = RobolangInterpreter::new();
        let reply = parsed(&robot.parse("2{ R"));
        assert_eq!(reply["total_errors"], json!(1));
        assert_eq!(reply["errors"][0]["code"], json!(101));
        assert_eq!(reply["errors"][0]["file"], json!("lesson.robo"));
        assert_eq!(reply["errors"][0]["line"], json!(1));
    }

    #[test]
    fn test_step_through_conditional() {
        let mut robot = RobolangInterpreter::new();
        robot.parse("A se livre { F } senao { R }");
        robot.set_variable("livre", true);
        assert!(robot.get_variable("livre"));

        assert_eq!(parsed(&robot.step()), json!({ "action": "A" }));
        assert_eq!(parsed(&robot.step()), json!({ "action": "F" }));
        assert_eq!(parsed(&robot.step()), json!({ "action": null }));
        assert!(robot.is_finished());
    }

    #[test]
    fn test_run_and_reset() {
        let mut robot = RobolangInterpreter::new();
        robot.parse("2{ L R }");
        assert_eq!(parsed(&robot.run()), json!({ "actions": ["L", "R", "L", "R"] }));
        assert_eq!(robot.reset(), "null");
        assert_eq!(parsed(&robot.step()), json!({ "action": "L" }));
    }

    #[test]
    fn test_errors_are_reported_as_json() {
        let mut robot = RobolangInterpreter::new();
        let reply = parsed(&robot.step());
        assert!(reply["error"].as_str().is_some_and(|e| e.contains("no program")));

        let mut bounded = RobolangInterpreter::with_gas_limit(50);
        bounded.parse("enquanto x { F }");
        bounded.set_variable("x", true);
        let reply = parsed(&bounded.run());
        assert!(reply["error"].as_str().is_some_and(|e| e.contains("gas exhausted")));
    }

    #[test]
    fn test_check_does_not_need_an_interpreter() {
        assert_eq!(check("se x { A }", "a.robo"), "null");
        let reply = parsed(&check("senao { A }", "a.robo"));
        assert_eq!(reply["errors"][0]["code"], json!(105));
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
