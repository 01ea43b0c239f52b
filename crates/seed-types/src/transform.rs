//! Per-column coercions applied to sheet cells.
//!
//! All functions are pure. Empty cells and blank text mean "absent" (SQL
//! NULL) for every nullable column; absent is never turned into zero except
//! where a column has an explicit fallback.

use crate::cell::Cell;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Role recorded for automated (IVR) sessions.
pub const SYSTEM_ROLE: &str = "system";

/// Clinical role stored in place of [`SYSTEM_ROLE`]; the schema has no
/// non-human provider role.
pub const SYSTEM_ROLE_STAND_IN: &str = "therapist";

/// Marker used in sheets for "not applicable" amounts and statuses.
pub const NOT_APPLICABLE: &str = "N/A";

/// Fallback for unspecified payment statuses.
pub const UNPAID: &str = "unpaid";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Timestamps with a UTC offset. The columns are `timestamp without time
/// zone`, so the offset is dropped and the wall-clock time kept.
const OFFSET_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

/// Errors raised when a cell cannot be coerced to its column type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("column '{column}': '{value}' is not a number")]
    InvalidNumber { column: &'static str, value: String },

    #[error("column '{column}': '{value}' is not a timestamp")]
    InvalidTimestamp { column: &'static str, value: String },

    #[error("column '{column}': '{value}' is not a date")]
    InvalidDate { column: &'static str, value: String },

    #[error("column '{column}': '{value}' is not a time of day")]
    InvalidTime { column: &'static str, value: String },

    #[error("column '{column}' is required but empty")]
    MissingKey { column: &'static str },
}

/// Text value; blank cells become `None`. Whole numbers are rendered without
/// a fractional part so numeric-looking codes (e.g. `4521`) survive.
pub fn text(cell: &Cell) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    Some(cell.to_string())
}

/// Text value that must be present (primary and unique keys).
pub fn required_text(cell: &Cell, column: &'static str) -> Result<String, TransformError> {
    text(cell)
        .map(|s| s.trim().to_string())
        .ok_or(TransformError::MissingKey { column })
}

/// Comma-delimited list, in source order. Blank cells give an empty list.
pub fn text_list(cell: &Cell) -> Vec<String> {
    text(cell)
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Boolean flag. Native booleans pass through; text equal to `true`
/// (any case) is true; every other value, including blanks, is false.
pub fn flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Numeric value; blank cells become `None`, not zero.
pub fn number(cell: &Cell, column: &'static str) -> Result<Option<Decimal>, TransformError> {
    let invalid = || TransformError::InvalidNumber {
        column,
        value: cell.to_string(),
    };
    match cell {
        _ if cell.is_blank() => Ok(None),
        Cell::Int(i) => Ok(Some(Decimal::from(*i))),
        Cell::Float(f) => Decimal::from_f64(*f).map(Some).ok_or_else(invalid),
        Cell::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map(Some)
                .map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Timestamp; blank cells become `None`. Date-only text is midnight.
pub fn timestamp(cell: &Cell, column: &'static str) -> Result<Option<NaiveDateTime>, TransformError> {
    match cell {
        _ if cell.is_blank() => Ok(None),
        Cell::DateTime(dt) => Ok(Some(*dt)),
        Cell::Text(s) => parse_timestamp(s.trim())
            .map(Some)
            .ok_or_else(|| TransformError::InvalidTimestamp {
                column,
                value: s.clone(),
            }),
        other => Err(TransformError::InvalidTimestamp {
            column,
            value: other.to_string(),
        }),
    }
}

/// Calendar date; blank cells become `None`.
pub fn date(cell: &Cell, column: &'static str) -> Result<Option<NaiveDate>, TransformError> {
    match cell {
        _ if cell.is_blank() => Ok(None),
        Cell::DateTime(dt) => Ok(Some(dt.date())),
        Cell::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_timestamp(s).map(|dt| dt.date()))
                .map(Some)
                .ok_or_else(|| TransformError::InvalidDate {
                    column,
                    value: s.to_string(),
                })
        }
        other => Err(TransformError::InvalidDate {
            column,
            value: other.to_string(),
        }),
    }
}

/// Time of day; blank cells become `None`.
pub fn time(cell: &Cell, column: &'static str) -> Result<Option<NaiveTime>, TransformError> {
    match cell {
        _ if cell.is_blank() => Ok(None),
        // Spreadsheet time cells carry a placeholder date.
        Cell::DateTime(dt) => Ok(Some(dt.time())),
        Cell::Text(s) => {
            let s = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                .map(Some)
                .ok_or_else(|| TransformError::InvalidTime {
                    column,
                    value: s.to_string(),
                })
        }
        other => Err(TransformError::InvalidTime {
            column,
            value: other.to_string(),
        }),
    }
}

/// Categorical value with a fallback for blank cells.
pub fn or_default(cell: &Cell, default: &str) -> String {
    text(cell).unwrap_or_else(|| default.to_string())
}

/// Provider role with the automated-system role mapped to a clinical one.
pub fn provider_role(cell: &Cell) -> Option<String> {
    text(cell).map(|role| {
        if role == SYSTEM_ROLE {
            SYSTEM_ROLE_STAND_IN.to_string()
        } else {
            role
        }
    })
}

/// Payout amount; blank and `N/A` mean zero.
pub fn payout(cell: &Cell, column: &'static str) -> Result<Decimal, TransformError> {
    if matches!(cell, Cell::Text(s) if s.trim() == NOT_APPLICABLE) {
        return Ok(Decimal::ZERO);
    }
    Ok(number(cell, column)?.unwrap_or(Decimal::ZERO))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            OFFSET_TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                .or_else(|| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            ["%Y-%m-%d", "%Y/%m/%d"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_text_blank_is_absent() {
        assert_eq!(text(&Cell::Empty), None);
        assert_eq!(text(&Cell::text("")), None);
        assert_eq!(text(&Cell::text("Bengaluru")), Some("Bengaluru".to_string()));
        assert_eq!(text(&Cell::Float(4521.0)), Some("4521".to_string()));
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(&Cell::text(" USR-1 "), "id").unwrap(), "USR-1");
        assert_eq!(
            required_text(&Cell::Empty, "id").unwrap_err(),
            TransformError::MissingKey { column: "id" }
        );
    }

    #[test]
    fn test_text_list() {
        assert_eq!(
            text_list(&Cell::text("Kannada,English, Hindi")),
            vec!["Kannada", "English", "Hindi"]
        );
        assert!(text_list(&Cell::text("")).is_empty());
        assert!(text_list(&Cell::Empty).is_empty());
        assert_eq!(text_list(&Cell::text("English")), vec!["English"]);
    }

    #[test]
    fn test_flag_coercion() {
        assert!(flag(&Cell::Bool(true)));
        assert!(!flag(&Cell::Bool(false)));
        assert!(flag(&Cell::text("TRUE")));
        assert!(flag(&Cell::text("true")));
        assert!(!flag(&Cell::text("yes")));
        assert!(!flag(&Cell::Int(1)));
        assert!(!flag(&Cell::Empty));
    }

    #[test]
    fn test_number_empty_is_not_zero() {
        assert_eq!(number(&Cell::Empty, "balance").unwrap(), None);
        assert_eq!(number(&Cell::text(""), "balance").unwrap(), None);
        assert_eq!(number(&Cell::Float(0.0), "balance").unwrap(), Some(Decimal::ZERO));
        assert_eq!(number(&Cell::Int(150), "balance").unwrap(), Some(Decimal::from(150)));
        assert_eq!(
            number(&Cell::text("18500.5"), "balance").unwrap(),
            Some(Decimal::from_str("18500.5").unwrap())
        );
    }

    #[test]
    fn test_number_rejects_garbage() {
        let err = number(&Cell::text("lots"), "balance").unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidNumber {
                column: "balance",
                value: "lots".to_string()
            }
        );
        assert!(number(&Cell::Bool(true), "balance").is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(
            timestamp(&Cell::text("2026-02-17 08:00"), "last_login").unwrap(),
            Some(dt("2026-02-17 08:00:00"))
        );
        assert_eq!(
            timestamp(&Cell::text("2025-11-19"), "created_at").unwrap(),
            Some(dt("2025-11-19 00:00:00"))
        );
        assert_eq!(
            timestamp(&Cell::text("2025-11-19T10:30:15"), "created_at").unwrap(),
            Some(dt("2025-11-19 10:30:15"))
        );
        assert_eq!(timestamp(&Cell::text(""), "trial_ends_at").unwrap(), None);
        assert_eq!(
            timestamp(&Cell::DateTime(dt("2026-01-17 00:00:00")), "x").unwrap(),
            Some(dt("2026-01-17 00:00:00"))
        );
        assert!(timestamp(&Cell::text("next tuesday"), "x").is_err());
    }

    #[test]
    fn test_timestamp_offset_keeps_wall_clock() {
        assert_eq!(
            timestamp(&Cell::text("2026-02-17 08:00:00+05:30"), "last_login").unwrap(),
            Some(dt("2026-02-17 08:00:00"))
        );
        assert_eq!(
            timestamp(&Cell::text("2026-02-17T08:00:00Z"), "last_login").unwrap(),
            Some(dt("2026-02-17 08:00:00"))
        );
        assert_eq!(
            timestamp(&Cell::text("2026-02-17 08:00+0530"), "last_login").unwrap(),
            Some(dt("2026-02-17 08:00:00"))
        );
        assert_eq!(
            timestamp(&Cell::text("2026/02/17 08:00"), "last_login").unwrap(),
            Some(dt("2026-02-17 08:00:00"))
        );
    }

    #[test]
    fn test_date_and_time() {
        assert_eq!(
            date(&Cell::text("2025-12-02"), "session_date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 2)
        );
        assert_eq!(
            time(&Cell::text("10:00"), "session_time").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert_eq!(
            time(&Cell::DateTime(dt("1899-12-31 14:30:00")), "session_time").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            time(&Cell::text("10:00 AM"), "session_time").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0)
        );
        assert_eq!(
            time(&Cell::text("2:30 pm"), "session_time").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            time(&Cell::text("18:45:10"), "session_time").unwrap(),
            NaiveTime::from_hms_opt(18, 45, 10)
        );
        assert!(time(&Cell::text("noon"), "session_time").is_err());
    }

    #[test]
    fn test_categorical_defaults() {
        assert_eq!(or_default(&Cell::Empty, UNPAID), "unpaid");
        assert_eq!(or_default(&Cell::text("paid"), UNPAID), "paid");
        assert_eq!(or_default(&Cell::text(""), NOT_APPLICABLE), "N/A");
    }

    #[test]
    fn test_provider_role_remap() {
        assert_eq!(provider_role(&Cell::text("system")), Some("therapist".to_string()));
        assert_eq!(provider_role(&Cell::text("psychiatrist")), Some("psychiatrist".to_string()));
        assert_eq!(provider_role(&Cell::Empty), None);
    }

    #[test]
    fn test_payout() {
        assert_eq!(payout(&Cell::text("N/A"), "provider_payout").unwrap(), Decimal::ZERO);
        assert_eq!(payout(&Cell::Empty, "provider_payout").unwrap(), Decimal::ZERO);
        assert_eq!(payout(&Cell::Float(680.0), "provider_payout").unwrap(), Decimal::from(680));
    }
}
