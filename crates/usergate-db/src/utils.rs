//! Shared utility functions

use chrono::{DateTime, Utc};

use crate::error::DbError;

/// Parse an RFC3339 timestamp column.
///
/// Stored timestamps are always written by this crate, so a value that
/// does not parse means the row was tampered with or written by something
/// else; it is reported as `MalformedRow` instead of being papered over.
pub fn parse_datetime(column: &str, s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::MalformedRow(format!("{}: {}", column, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_datetime("created_at", "2024-01-01T12:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let result = parse_datetime("created_at", "yesterday");
        assert!(matches!(result, Err(DbError::MalformedRow(msg)) if msg.starts_with("created_at")));
    }
}
