//! Choosing which scripts an upgrade run still has to apply.

use std::collections::HashSet;
use uj_core::{Script, ScriptKind};

/// Scripts from `available` that should run, in the caller's order.
///
/// Run-once scripts already present in `executed` are skipped; run-always
/// scripts are always kept. Rolled-back entries carry a prefixed name, so the
/// original script counts as unapplied again.
pub fn pending_scripts<'a>(available: &'a [Script], executed: &[String]) -> Vec<&'a Script> {
    let executed: HashSet<&str> = executed.iter().map(String::as_str).collect();
    available
        .iter()
        .filter(|script| match script.kind {
            ScriptKind::RunAlways => true,
            ScriptKind::RunOnce => !executed.contains(script.name()),
        })
        .collect()
}
