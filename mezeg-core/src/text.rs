//! Small string helpers shared by the catalog and the history display.

use chrono::DateTime;

/// Trims leading/trailing whitespace and collapses internal whitespace runs
/// into single spaces.
pub fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Formats an ISO-8601 timestamp as `DD/MM/YYYY HH:MM`, in the offset the
/// timestamp was recorded with. A malformed input is returned unchanged.
pub fn format_timestamp(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}
