//! Upgrade scripts as the journal sees them.

use serde::{Deserialize, Serialize};

/// How often a script may be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// Applied at most once, then skipped on later runs (default)
    #[default]
    RunOnce,
    /// Idempotent; applied on every run regardless of history
    RunAlways,
}

/// A named unit of change.
///
/// The journal only reads [`name`](Self::name); contents travel with the
/// script for the executor that applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Unique, orderable script name (e.g. `001_init.sql`)
    pub name: String,

    /// SQL text handed to the executor
    #[serde(default)]
    pub contents: String,

    /// Whether the script may run more than once
    #[serde(default)]
    pub kind: ScriptKind,
}

impl Script {
    /// Create a run-once script.
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            kind: ScriptKind::RunOnce,
        }
    }

    /// Create a script that is applied on every run.
    pub fn run_always(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            kind: ScriptKind::RunAlways,
        }
    }

    /// Script name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
