//! Full journal rows, as read back for reporting.

use crate::error::{JournalError, JournalResult};
use crate::schema::ROLLED_BACK_PREFIX;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Text forms `Applied` comes back in across backends
const APPLIED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// One row of the journal table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutedScript {
    pub id: i64,
    pub script_name: String,
    pub applied_at: NaiveDateTime,
    /// 0 for rows recorded before batch numbering existed
    pub batch_number: i64,
}

impl ExecutedScript {
    /// Whether this entry was marked rolled back.
    pub fn is_rolled_back(&self) -> bool {
        self.script_name.starts_with(ROLLED_BACK_PREFIX)
    }

    /// Decode an `[Id, ScriptName, Applied, BatchNumber]` text row.
    pub fn from_row(row: &[String]) -> JournalResult<Self> {
        let [id, script_name, applied, batch] = row else {
            return Err(JournalError::InvalidRecord(format!(
                "expected 4 columns, got {}",
                row.len()
            )));
        };
        Ok(Self {
            id: parse_int("Id", id)?,
            script_name: script_name.clone(),
            applied_at: parse_applied(applied)?,
            batch_number: parse_int("BatchNumber", batch)?,
        })
    }
}

fn parse_int(column: &str, value: &str) -> JournalResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| JournalError::InvalidRecord(format!("{column} is not an integer: {value}")))
}

fn parse_applied(value: &str) -> JournalResult<NaiveDateTime> {
    let trimmed = value.trim();
    APPLIED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| JournalError::InvalidRecord(format!("Applied is not a timestamp: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_row_space_separated() {
        let rec = ExecutedScript::from_row(&row(&["7", "001_init.sql", "2024-05-01 10:20:30", "2"]))
            .unwrap();
        assert_eq!(rec.id, 7);
        assert_eq!(rec.script_name, "001_init.sql");
        assert_eq!(
            rec.applied_at,
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 20, 30)
                .unwrap()
        );
        assert_eq!(rec.batch_number, 2);
        assert!(!rec.is_rolled_back());
    }

    #[test]
    fn test_from_row_iso_with_fraction() {
        let rec = ExecutedScript::from_row(&row(&[
            "1",
            "rolledback_002.sql",
            "2024-05-01T10:20:30.125",
            "0",
        ]))
        .unwrap();
        assert_eq!(rec.applied_at.and_utc().timestamp_subsec_millis(), 125);
        assert!(rec.is_rolled_back());
    }

    #[test]
    fn test_from_row_rejects_bad_rows() {
        assert!(matches!(
            ExecutedScript::from_row(&row(&["1", "a.sql"])),
            Err(JournalError::InvalidRecord(_))
        ));
        assert!(ExecutedScript::from_row(&row(&["x", "a.sql", "2024-05-01 10:20:30", "1"])).is_err());
        assert!(ExecutedScript::from_row(&row(&["1", "a.sql", "yesterday", "1"])).is_err());
    }
}
