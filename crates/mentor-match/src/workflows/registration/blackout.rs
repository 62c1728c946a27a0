//! Parser for the free-text blackout date field.
//!
//! The field accepts comma-separated tokens, each either a single
//! `YYYYMMDD` date or a `YYYYMMDD-YYYYMMDD` range. Whitespace around
//! tokens is ignored and an empty field is valid.

use chrono::NaiveDate;

/// One blackout entry: a single day or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlackoutSpan {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlackoutParseError {
    #[error("'{0}' is not an 8-digit YYYYMMDD date")]
    InvalidDate(String),
    #[error("'{0}' has more than one dash; expected YYYYMMDD or YYYYMMDD-YYYYMMDD")]
    MalformedRange(String),
    #[error("range '{0}' runs backwards")]
    BackwardsRange(String),
}

/// Parse the full field. Returns the structured spans so callers can keep
/// the raw text for the wire while still rejecting garbage early.
pub fn parse_blackout_dates(raw: &str) -> Result<Vec<BlackoutSpan>, BlackoutParseError> {
    let mut spans = Vec::new();

    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let mut parts = token.split('-');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(BlackoutParseError::MalformedRange(token.to_string()));
        }

        let start = parse_day(first)?;
        let end = second.map(parse_day).transpose()?;
        if let Some(end) = end {
            if end < start {
                return Err(BlackoutParseError::BackwardsRange(token.to_string()));
            }
        }

        spans.push(BlackoutSpan { start, end });
    }

    Ok(spans)
}

fn parse_day(raw: &str) -> Result<NaiveDate, BlackoutParseError> {
    let trimmed = raw.trim();
    if trimmed.len() != 8 || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(BlackoutParseError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map_err(|_| BlackoutParseError::InvalidDate(trimmed.to_string()))
}
