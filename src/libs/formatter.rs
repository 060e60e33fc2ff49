//! Date/time conversions shared by the database layer, the CLI and the mails.
//!
//! The database stores every timestamp as UTC text in [`DATETIME_FORMAT`], so
//! lexical comparison in SQL (`due_date <= ?`) matches chronological order.

use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Input formats accepted for due dates, interpreted in local time.
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

pub fn to_sql_datetime(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn parse_sql_datetime(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map(|naive| naive.and_utc())
}

/// Drops sub-second precision so a value survives a trip through the database.
pub fn truncate_to_seconds(value: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(value.timestamp(), 0).single().unwrap_or(value)
}

/// Parses a due date typed by the user.
///
/// RFC 3339 input keeps its offset. Naive input is read as local wall-clock
/// time, and a bare date means midnight of that day.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(value) = DateTime::parse_from_rfc3339(input) {
        return Ok(truncate_to_seconds(value.with_timezone(&Utc)));
    }

    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| msg_error_anyhow!(Message::InvalidDueDate(input.to_string())))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| truncate_to_seconds(local.with_timezone(&Utc)))
        .ok_or_else(|| msg_error_anyhow!(Message::InvalidDueDate(input.to_string())))
}

/// Human form used in tables and mail bodies.
pub fn format_due_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(value) => format!("{} UTC", value.format(DISPLAY_FORMAT)),
        None => Message::DueDateNone.to_string(),
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.with_timezone(&Local).format(DISPLAY_FORMAT).to_string()
}

/// First `limit` characters of `text`, with an ellipsis when something was cut.
pub fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_datetime_round_trip_is_lexically_ordered() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
        let early_sql = to_sql_datetime(&early);
        let late_sql = to_sql_datetime(&late);

        assert_eq!(early_sql, "2024-01-01 00:00:00");
        assert!(early_sql < late_sql);
        assert_eq!(parse_sql_datetime(&late_sql).unwrap(), late);
    }

    #[test]
    fn parse_due_date_accepts_rfc3339_with_offset() {
        let parsed = parse_due_date("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_due_date_reads_naive_input_as_local_time() {
        let parsed = parse_due_date("2024-03-10T09:30").unwrap();
        let expected = Local
            .from_local_datetime(&NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(9, 30, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
        assert_eq!(parse_due_date("2024-03-10 09:30").unwrap(), expected);
    }

    #[test]
    fn parse_due_date_rejects_garbage() {
        assert!(parse_due_date("next tuesday").is_err());
        assert!(parse_due_date("2024-13-01").is_err());
    }

    #[test]
    fn truncate_drops_subseconds() {
        let value = Utc.timestamp_opt(1_700_000_000, 999_000_000).single().unwrap();
        assert_eq!(truncate_to_seconds(value).timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("éééééé", 3), "ééé...");
        assert_eq!(preview(&"x".repeat(50), 50), "x".repeat(50));
        assert_eq!(preview(&"x".repeat(51), 50), format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn missing_due_date_renders_none() {
        assert_eq!(format_due_date(None), "None");
        let due = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(format_due_date(Some(&due)), "2024-02-01 00:00 UTC");
    }
}
