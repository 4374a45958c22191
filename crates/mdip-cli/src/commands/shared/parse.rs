use chrono::{DateTime, Utc};
use mdip_core::enums::Enumerated;
use mdip_core::validate::parse_timestamp;

/// Parse an enum value typed on the command line.
///
/// The match against the canonical label is exact and case-sensitive. The
/// only alias is `-` or `_` for a space, so `In-Progress` selects
/// `In Progress` while `high` is rejected.
pub fn parse_enum<T: Enumerated>(raw: &str, field: &str) -> anyhow::Result<T> {
    let spaced = raw.replace(['-', '_'], " ");
    T::from_label(&spaced).map_err(|_| {
        anyhow::anyhow!(
            "invalid {field} '{raw}': expected one of {}",
            T::LABELS.join(", ")
        )
    })
}

/// Parse an optional timestamp argument, defaulting to now.
pub fn parse_when(raw: Option<&str>, field: &'static str) -> anyhow::Result<DateTime<Utc>> {
    match raw {
        Some(raw) => Ok(parse_timestamp(field, raw)?),
        None => Ok(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use mdip_core::enums::{IncidentStatus, Severity, TicketStatus};

    use super::parse_enum;

    #[test]
    fn parses_canonical_label() {
        let severity: Severity = parse_enum("Critical", "severity").expect("should parse");
        assert_eq!(severity, Severity::Critical);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: IncidentStatus = parse_enum("In-Progress", "status").expect("should parse");
        assert_eq!(status, IncidentStatus::InProgress);
        let waiting: TicketStatus =
            parse_enum("Waiting_for_User", "status").expect("should parse");
        assert_eq!(waiting, TicketStatus::WaitingForUser);
    }

    #[test]
    fn wrong_case_is_rejected() {
        let err = parse_enum::<Severity>("high", "severity").expect_err("should fail");
        assert!(err.to_string().contains("invalid severity 'high'"));
        assert!(parse_enum::<IncidentStatus>("in-progress", "status").is_err());
        assert!(parse_enum::<Severity>(" High", "severity").is_err());
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Severity>("severe", "severity").expect_err("should fail");
        assert!(err.to_string().contains("invalid severity 'severe'"));
        assert!(err.to_string().contains("Critical"));
    }
}
