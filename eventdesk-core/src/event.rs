//! Scheduled events.
//!
//! Stored in their own JSON document using the established Indonesian field
//! names, so existing `events.json` files keep loading.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ACCESS_SIGIL;
use crate::entity::{Categorized, Entity, FieldId};
use crate::error::ValidationError;
use crate::validate;

/// A scheduled event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique name
    #[serde(rename = "nama")]
    pub name: String,
    /// Where the event was announced
    #[serde(rename = "sumber")]
    pub source: String,
    /// Free-text weekday label, e.g. "Senin"
    #[serde(rename = "hari")]
    pub weekday: String,
    /// `DD/MM/YYYY`
    #[serde(rename = "tanggal")]
    pub date: String,
    /// `HH:MM`, interpreted as UTC
    #[serde(rename = "jam")]
    pub time: String,
    #[serde(rename = "akses")]
    pub access: AccessLevel,
}

/// Who may see an event.
/// Written as `@member`/`@sbx`; read case-insensitively, sigil optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum AccessLevel {
    #[serde(rename = "@member")]
    Member,
    #[serde(rename = "@sbx")]
    Sbx,
}

impl AccessLevel {
    pub const ALL: &'static [AccessLevel] = &[AccessLevel::Member, AccessLevel::Sbx];

    /// Lower-case name without the sigil.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Member => "member",
            AccessLevel::Sbx => "sbx",
        }
    }

    /// Stored representation, e.g. `@member`.
    pub fn tagged(&self) -> String {
        format!("{}{}", ACCESS_SIGIL, self.as_str())
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tagged())
    }
}

impl TryFrom<String> for AccessLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse()
            .map_err(|()| format!("unknown access level '{}'", value))
    }
}

impl FromStr for AccessLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix(ACCESS_SIGIL).unwrap_or(s);
        AccessLevel::ALL
            .iter()
            .copied()
            .find(|level| level.as_str().eq_ignore_ascii_case(bare))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Name,
    Source,
    Weekday,
    Date,
    Time,
    Access,
}

impl FieldId for EventField {
    const ALL: &'static [Self] = &[
        EventField::Name,
        EventField::Source,
        EventField::Weekday,
        EventField::Date,
        EventField::Time,
        EventField::Access,
    ];

    fn name(self) -> &'static str {
        match self {
            EventField::Name => "nama",
            EventField::Source => "sumber",
            EventField::Weekday => "hari",
            EventField::Date => "tanggal",
            EventField::Time => "jam",
            EventField::Access => "akses",
        }
    }

    fn label(self) -> &'static str {
        match self {
            EventField::Name => "Name",
            EventField::Source => "Source",
            EventField::Weekday => "Day",
            EventField::Date => "Date (DD/MM/YYYY)",
            EventField::Time => "Time (HH:MM)",
            EventField::Access => "Access (member/sbx)",
        }
    }

    fn is_key(self) -> bool {
        self == EventField::Name
    }
}

impl Event {
    /// Start of the event as a UTC instant, or `None` when the stored
    /// date/time does not parse.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        let raw = format!("{} {}", self.date.trim(), self.time.trim());
        NaiveDateTime::parse_from_str(&raw, "%d/%m/%Y %H:%M")
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// Whether the event started strictly before `now`. Unparseable
    /// events are never considered expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.starts_at().is_some_and(|start| start < now)
    }
}

impl Entity for Event {
    type Field = EventField;

    const KIND: &'static str = "event";

    fn key(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!(
            "{} {} ⏰{} 🔐{}",
            self.weekday, self.date, self.time, self.access
        )
    }

    fn field_value(&self, field: EventField) -> String {
        match field {
            EventField::Name => self.name.clone(),
            EventField::Source => self.source.clone(),
            EventField::Weekday => self.weekday.clone(),
            EventField::Date => self.date.clone(),
            EventField::Time => self.time.clone(),
            EventField::Access => self.access.as_str().to_string(),
        }
    }

    fn apply(&mut self, field: EventField, raw: &str) -> Result<(), ValidationError> {
        match field {
            EventField::Name => self.name = validate::required("Name", raw)?,
            EventField::Source => self.source = validate::required("Source", raw)?,
            EventField::Weekday => self.weekday = validate::required("Day", raw)?,
            EventField::Date => self.date = validate::date(raw)?,
            EventField::Time => self.time = validate::time(raw)?,
            EventField::Access => self.access = validate::access(raw)?,
        }
        Ok(())
    }
}

impl Categorized for Event {
    fn category(&self) -> &str {
        self.access.as_str()
    }
}

/// Unvalidated input for a new event.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub name: String,
    pub source: String,
    pub weekday: String,
    pub date: String,
    pub time: String,
    pub access: String,
}

impl EventDraft {
    /// Validate every field at once, collecting all rejections.
    pub fn validate(&self) -> Result<Event, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut check = |result: Result<String, ValidationError>| match result {
            Ok(v) => v,
            Err(e) => {
                errors.push(e);
                String::new()
            }
        };

        let name = check(validate::required("Name", &self.name));
        let source = check(validate::required("Source", &self.source));
        let weekday = check(validate::required("Day", &self.weekday));
        let date = check(validate::date(&self.date));
        let time = check(validate::time(&self.time));
        let access = validate::access(&self.access);

        match access {
            Ok(access) if errors.is_empty() => Ok(Event {
                name,
                source,
                weekday,
                date,
                time,
                access,
            }),
            Ok(_) => Err(errors),
            Err(e) => {
                errors.push(e);
                Err(errors)
            }
        }
    }

    /// Field values in [`EventField::ALL`] order, as shown in the create form.
    pub fn values(&self) -> [&str; 6] {
        [
            &self.name,
            &self.source,
            &self.weekday,
            &self.date,
            &self.time,
            &self.access,
        ]
    }

    pub fn from_values(values: &[String]) -> Self {
        let get = |i: usize| values.get(i).cloned().unwrap_or_default();
        EventDraft {
            name: get(0),
            source: get(1),
            weekday: get(2),
            date: get(3),
            time: get(4),
            access: get(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn make_test_event(name: &str, date: &str, time: &str) -> Event {
        Event {
            name: name.to_string(),
            source: "Discord".to_string(),
            weekday: "Senin".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            access: AccessLevel::Member,
        }
    }

    #[test]
    fn test_serializes_with_stored_field_names() {
        let event = make_test_event("AMA", "05/05/2099", "10:00");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["nama"], "AMA");
        assert_eq!(json["tanggal"], "05/05/2099");
        assert_eq!(json["jam"], "10:00");
        assert_eq!(json["akses"], "@member");
    }

    #[test]
    fn test_access_reads_any_case_and_writes_canonical() {
        for raw in ["\"@Member\"", "\"MEMBER\"", "\" @member \""] {
            let level: AccessLevel = serde_json::from_str(raw).unwrap();
            assert_eq!(level, AccessLevel::Member);
        }
        let level: AccessLevel = serde_json::from_str("\"@SBX\"").unwrap();
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"@sbx\"");
        assert!(serde_json::from_str::<AccessLevel>("\"@admin\"").is_err());
    }

    #[test]
    fn test_starts_at_is_utc() {
        let event = make_test_event("AMA", "5/5/2099", "10:00");
        assert_eq!(
            event.starts_at(),
            Some(Utc.with_ymd_and_hms(2099, 5, 5, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_is_expired_is_strict() {
        let event = make_test_event("AMA", "05/05/2020", "10:00");
        let start = Utc.with_ymd_and_hms(2020, 5, 5, 10, 0, 0).unwrap();
        assert!(!event.is_expired(start));
        assert!(event.is_expired(start + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_malformed_event_never_expires() {
        let event = make_test_event("Broken", "someday", "noon");
        assert!(event.starts_at().is_none());
        assert!(!event.is_expired(Utc::now()));
    }

    #[test]
    fn test_access_field_value_strips_sigil() {
        let mut event = make_test_event("AMA", "05/05/2099", "10:00");
        event.access = AccessLevel::Sbx;
        assert_eq!(event.field_value(EventField::Access), "sbx");
    }

    #[test]
    fn test_apply_uses_field_validator() {
        let mut event = make_test_event("AMA", "05/05/2099", "10:00");
        assert!(event.apply(EventField::Time, "25:61").is_err());
        assert_eq!(event.time, "10:00");

        event.apply(EventField::Access, " SBX ").unwrap();
        assert_eq!(event.access, AccessLevel::Sbx);

        event.apply(EventField::Date, "29/02/2024").unwrap();
        assert_eq!(event.date, "29/02/2024");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in EventField::ALL {
            assert_eq!(EventField::from_name(field.name()), Some(*field));
        }
        assert_eq!(EventField::from_name("unknown"), None);
    }

    #[test]
    fn test_draft_collects_every_error() {
        let draft = EventDraft {
            name: "AMA".into(),
            source: "".into(),
            weekday: "Senin".into(),
            date: "31/02/2025".into(),
            time: "10:00".into(),
            access: "admin".into(),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Empty("Source")));
        assert!(errors.contains(&ValidationError::Date("31/02/2025".into())));
        assert!(errors.contains(&ValidationError::Access("admin".into())));
    }

    #[test]
    fn test_draft_normalizes_access() {
        let draft = EventDraft {
            name: " AMA ".into(),
            source: "Twitter".into(),
            weekday: "Senin".into(),
            date: "05/05/2099".into(),
            time: "10:00".into(),
            access: "Member".into(),
        };
        let event = draft.validate().unwrap();
        assert_eq!(event.name, "AMA");
        assert_eq!(event.access, AccessLevel::Member);
    }
}
