//! Converting a wall-clock time between the supported zones.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::error::ValidationError;
use crate::validate;

/// Supported zone abbreviations.
pub const ZONES: &[(&str, Tz)] = &[
    ("WIB", chrono_tz::Asia::Jakarta),
    ("WITA", chrono_tz::Asia::Makassar),
    ("WIT", chrono_tz::Asia::Jayapura),
    ("EST", chrono_tz::America::New_York),
    ("PST", chrono_tz::America::Los_Angeles),
    ("CET", chrono_tz::Europe::Berlin),
    ("GMT", chrono_tz::GMT),
    ("UTC", chrono_tz::UTC),
    ("AEST", chrono_tz::Australia::Sydney),
];

pub fn lookup(abbr: &str) -> Option<Tz> {
    ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(abbr.trim()))
        .map(|(_, tz)| *tz)
}

/// Abbreviations containing `partial`, for completion.
pub fn suggest(partial: &str) -> Vec<&'static str> {
    let partial = partial.to_lowercase();
    ZONES
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| name.to_lowercase().contains(&partial))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub source: DateTime<Tz>,
    pub target: DateTime<Tz>,
}

/// Interpret `time` (`HH:MM`) on `day` in zone `from` and express it in zone `to`.
pub fn convert(
    from: &str,
    to: &str,
    time: &str,
    day: NaiveDate,
) -> Result<Conversion, ValidationError> {
    let from_tz = lookup(from).ok_or_else(|| ValidationError::TimeZone(from.trim().to_string()))?;
    let to_tz = lookup(to).ok_or_else(|| ValidationError::TimeZone(to.trim().to_string()))?;
    let clock = validate::parse_time(time.trim())
        .ok_or_else(|| ValidationError::Time(time.trim().to_string()))?;

    // Times skipped by a DST jump fall back to the later offset.
    let local = day.and_time(clock);
    let source = from_tz
        .from_local_datetime(&local)
        .earliest()
        .or_else(|| from_tz.from_local_datetime(&(local + chrono::Duration::hours(1))).earliest())
        .ok_or_else(|| ValidationError::Time(time.trim().to_string()))?;

    Ok(Conversion {
        source,
        target: source.with_timezone(&to_tz),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_wib_to_utc() {
        let c = convert("WIB", "UTC", "10:00", day()).unwrap();
        assert_eq!(c.target.format("%d/%m/%Y %H:%M").to_string(), "15/01/2025 03:00");
    }

    #[test]
    fn test_crosses_date_line() {
        let c = convert("wib", "pst", "08:00", day()).unwrap();
        assert_eq!(c.target.format("%d/%m/%Y %H:%M").to_string(), "14/01/2025 17:00");
    }

    #[test]
    fn test_unknown_zone() {
        assert_eq!(
            convert("MARS", "UTC", "10:00", day()),
            Err(ValidationError::TimeZone("MARS".into()))
        );
    }

    #[test]
    fn test_bad_time() {
        assert!(matches!(
            convert("WIB", "UTC", "24:00", day()),
            Err(ValidationError::Time(_))
        ));
    }

    #[test]
    fn test_suggest() {
        assert_eq!(suggest("wi"), vec!["WIB", "WITA", "WIT"]);
        assert_eq!(suggest("").len(), ZONES.len());
    }
}
