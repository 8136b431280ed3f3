//! DateTime literal parsing
//!
//! ECSQL DateTime literals carry their raw text (`DATE '2024-03-01'`,
//! `TIME '12:30:00'`, `TIMESTAMP '2024-03-01T12:30:00Z'`). The text has to
//! parse into a structured value for the literal to be accepted.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::{DateTimeComponent, DateTimeInfo, DateTimeKind};

/// Errors raised for malformed DateTime literal text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeParseError {
    #[error("'{text}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { text: String },

    #[error("'{text}' is not a valid time of day (expected hh:mm[:ss[.fff]])")]
    InvalidTime { text: String },

    #[error("'{text}' is not a valid timestamp (expected YYYY-MM-DDThh:mm[:ss[.fff]][Z])")]
    InvalidTimestamp { text: String },
}

/// Structured value of a DateTime literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDateTime {
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime, DateTimeKind),
}

impl ParsedDateTime {
    /// The DateTime info describing this value
    pub fn info(&self) -> DateTimeInfo {
        match self {
            Self::Date(_) => DateTimeInfo::date_only(),
            Self::Time(_) => DateTimeInfo::time_of_day(),
            Self::Timestamp(_, kind) => DateTimeInfo::date_and_time(*kind),
        }
    }
}

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse DateTime literal text for the given component
pub fn parse_date_time_literal(
    component: DateTimeComponent,
    text: &str,
) -> Result<ParsedDateTime, DateTimeParseError> {
    let trimmed = text.trim();
    match component {
        DateTimeComponent::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(ParsedDateTime::Date)
            .map_err(|_| DateTimeParseError::InvalidDate {
                text: text.to_string(),
            }),
        DateTimeComponent::TimeOfDay => TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
            .map(ParsedDateTime::Time)
            .ok_or_else(|| DateTimeParseError::InvalidTime {
                text: text.to_string(),
            }),
        DateTimeComponent::DateAndTime => {
            let (body, kind) = match trimmed.strip_suffix('Z') {
                Some(body) => (body, DateTimeKind::Utc),
                None => (trimmed, DateTimeKind::Unspecified),
            };
            let normalized = body.replacen(' ', "T", 1);
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
                .map(|dt| ParsedDateTime::Timestamp(dt, kind))
                .ok_or_else(|| DateTimeParseError::InvalidTimestamp {
                    text: text.to_string(),
                })
        }
    }
}
