//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into core entities.
//! These helpers isolate the column decoding; the entity constructors still
//! re-check every rule, so a corrupt row never becomes a value.

use chrono::{DateTime, Utc};
use mdip_core::enums::{EntityKind, Enumerated};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column holding an enumeration label.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the label is not a member.
pub fn parse_label<E: Enumerated>(column: &str, s: &str) -> Result<E, DatabaseError> {
    E::from_label(s)
        .map_err(|e| DatabaseError::InvalidState(format!("column {column}: {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Bind an optional text value, NULL when absent.
#[must_use]
pub fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |v| libsql::Value::Text(v.to_string()))
}

/// Bind an optional integer value, NULL when absent.
#[must_use]
pub fn opt_integer(value: Option<i64>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Integer)
}

/// Bind an optional real value, NULL when absent.
#[must_use]
pub fn opt_real(value: Option<f64>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Real)
}

/// `LIKE` pattern matching `needle` anywhere, case-insensitive when compared
/// against `lower(column)`. `%`, `_` and `\` are escaped.
///
/// SQLite's `lower()` folds ASCII only, so the needle is folded the same
/// way. Non-ASCII letters match case-sensitively.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Convert a SQL count to `u64`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` on a negative count.
pub fn to_count(value: i64) -> Result<u64, DatabaseError> {
    u64::try_from(value).map_err(|_| DatabaseError::InvalidState(format!("negative count {value}")))
}

/// Map `EntityKind` to the corresponding SQL table name.
///
/// Exhaustive over `EntityKind`.
#[must_use]
pub const fn entity_table(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Incident => "incidents",
        EntityKind::Dataset => "datasets",
        EntityKind::Ticket => "tickets",
        EntityKind::User => "users",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdip_core::enums::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_both_datetime_forms() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_label_is_invalid_state() {
        assert_eq!(parse_label::<Severity>("severity", "High").unwrap(), Severity::High);
        assert!(matches!(
            parse_label::<Severity>("severity", "urgent"),
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("VPN"), "%vpn%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn like_pattern_folds_ascii_only() {
        assert_eq!(contains_pattern("ÉCOLE VPN"), "%École vpn%");
        assert_eq!(contains_pattern("Straße"), "%straße%");
    }
}
