//! Logical shape of the journal table and its evolution steps.
//!
//! Version 1 holds `Id`, `ScriptName`, and `Applied`. Each later version adds
//! one integer column through [`EVOLUTIONS`], which the schema evolver
//! replays against tables created by older releases.

/// Auto-increment primary key
pub const ID_COLUMN: &str = "Id";

/// Name of the applied script
pub const SCRIPT_NAME_COLUMN: &str = "ScriptName";

/// When the script was recorded (UTC)
pub const APPLIED_COLUMN: &str = "Applied";

/// Upgrade run the script belongs to
pub const BATCH_NUMBER_COLUMN: &str = "BatchNumber";

/// Marker prepended to a script name when its entry is rolled back
pub const ROLLED_BACK_PREFIX: &str = "rolledback_";

/// Batch number reported when nothing has been recorded yet
pub const EMPTY_BATCH_NUMBER: i64 = 0;

/// An integer column added to the journal table after version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEvolution {
    /// Journal version that introduced the column
    pub version: i32,
    /// Unquoted column name
    pub column: &'static str,
    /// Value back-filled into rows that predate the column
    pub default: i64,
}

/// All evolution steps, in version order.
pub static EVOLUTIONS: &[ColumnEvolution] = &[ColumnEvolution {
    version: 2,
    column: BATCH_NUMBER_COLUMN,
    default: 0,
}];

/// Version of the table shape `CREATE TABLE` produces.
pub fn current_version() -> i32 {
    EVOLUTIONS.last().map_or(1, |evolution| evolution.version)
}

/// Name an entry takes once rolled back.
///
/// Applying this to an already rolled-back name stacks the prefix.
pub fn rolled_back_name(script_name: &str) -> String {
    format!("{ROLLED_BACK_PREFIX}{script_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_follows_last_evolution() {
        assert_eq!(current_version(), 2);
    }

    #[test]
    fn test_evolutions_are_ordered() {
        assert!(EVOLUTIONS.windows(2).all(|w| w[0].version < w[1].version));
    }

    #[test]
    fn test_rolled_back_name_stacks() {
        assert_eq!(rolled_back_name("001.sql"), "rolledback_001.sql");
        assert_eq!(
            rolled_back_name(&rolled_back_name("001.sql")),
            "rolledback_rolledback_001.sql"
        );
    }
}
