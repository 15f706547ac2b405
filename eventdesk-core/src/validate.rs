//! Field format checkers shared by the create and edit paths.
//!
//! Every validator trims its input and either returns the value in the
//! form it is stored in, or the reason it was rejected.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::ValidationError;
use crate::event::AccessLevel;
use crate::item::Category;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("valid date regex"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

pub fn valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

pub fn valid_time(s: &str) -> bool {
    parse_time(s).is_some()
}

/// Parse `D/M/YYYY` (one or two digit day and month) into a calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

/// Parse `HH:MM` (24h, zero padded).
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    if !TIME_RE.is_match(s) {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

pub fn date(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if valid_date(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::Date(value.to_string()))
    }
}

pub fn time(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if valid_time(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::Time(value.to_string()))
    }
}

/// Case-insensitive match against the access levels. A leading sigil is
/// tolerated so a stored value can be fed back in unchanged.
pub fn access(raw: &str) -> Result<AccessLevel, ValidationError> {
    raw.trim()
        .parse::<AccessLevel>()
        .map_err(|_| ValidationError::Access(raw.trim().to_string()))
}

pub fn category(raw: &str) -> Result<Category, ValidationError> {
    raw.trim().parse::<Category>().map_err(|_| {
        let allowed = Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ValidationError::Category(raw.trim().to_string(), allowed)
    })
}

/// Any non-blank text, trimmed.
pub fn required(label: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(ValidationError::Empty(label))
    } else {
        Ok(value.to_string())
    }
}
