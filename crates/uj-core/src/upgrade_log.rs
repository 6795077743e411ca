//! Informational log sink handed to journals.
//!
//! Journals report lifecycle notes (table missing, table created, column
//! added) through [`UpgradeLog`]. The default [`LogFacade`] forwards to the
//! `log` crate, so sink configuration stays with the binary.

use std::sync::{Arc, Mutex};

/// Receiver for journal lifecycle messages.
pub trait UpgradeLog: Send + Sync {
    /// Record an informational message. Never fails.
    fn write_information(&self, message: &str);
}

/// Forwards messages to `log::info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl UpgradeLog for LogFacade {
    fn write_information(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Keeps every message in memory, for callers that report after a run.
#[derive(Debug, Default)]
pub struct MemoryLog {
    messages: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages recorded so far.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl UpgradeLog for MemoryLog {
    fn write_information(&self, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}

impl<T: UpgradeLog + ?Sized> UpgradeLog for Arc<T> {
    fn write_information(&self, message: &str) {
        (**self).write_information(message);
    }
}
