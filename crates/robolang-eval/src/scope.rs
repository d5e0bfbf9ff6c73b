//! Variable scope read by conditions and written by the embedding host.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named values consulted by `se` and `enquanto`.
///
/// robolang has no assignment statement, so the evaluator only reads from
/// a scope; the host writes to it between steps. A write is visible to the
/// very next condition the evaluator checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a variable. Unset names read as `Value::Bool(false)`.
    pub fn get(&self, name: &str) -> Value {
        self.lookup(name).unwrap_or_default()
    }

    /// Read a variable, distinguishing "unset" from "set to false".
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    /// Create or overwrite a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Remove a variable; later reads see the default again.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Truthiness of a variable as a condition.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_truthy()
    }

    /// All bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.bindings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
