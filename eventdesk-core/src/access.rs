//! Role-based visibility of events.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};
use crate::event::{AccessLevel, Event};

/// Which role identifiers grant which visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Sees member-only events
    #[serde(default = "default_member_role")]
    pub member: String,
    /// Sees every event
    #[serde(default = "default_elevated_role")]
    pub elevated: String,
}

fn default_member_role() -> String {
    "member".to_string()
}

fn default_elevated_role() -> String {
    "sbx".to_string()
}

impl Default for RoleConfig {
    fn default() -> Self {
        RoleConfig {
            member: default_member_role(),
            elevated: default_elevated_role(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Everything,
    MembersOnly,
}

impl Visibility {
    /// Resolve a caller's roles. Callers with neither role are denied
    /// outright rather than shown an empty list.
    pub fn for_roles<S: AsRef<str>>(roles: &[S], config: &RoleConfig) -> DeskResult<Self> {
        let holds = |wanted: &str| roles.iter().any(|r| r.as_ref() == wanted);

        if holds(&config.elevated) {
            Ok(Visibility::Everything)
        } else if holds(&config.member) {
            Ok(Visibility::MembersOnly)
        } else {
            Err(DeskError::AccessDenied)
        }
    }

    pub fn permits(&self, event: &Event) -> bool {
        match self {
            Visibility::Everything => true,
            Visibility::MembersOnly => event.access == AccessLevel::Member,
        }
    }
}

/// Events `roles` may see, ordered by start time. Events whose date/time
/// does not parse sort last.
pub fn visible_events<S: AsRef<str>>(
    events: Vec<Event>,
    roles: &[S],
    config: &RoleConfig,
) -> DeskResult<Vec<Event>> {
    let visibility = Visibility::for_roles(roles, config)?;

    let mut visible: Vec<Event> = events.into_iter().filter(|e| visibility.permits(e)).collect();
    visible.sort_by(|a, b| match (a.starts_at(), b.starts_at()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    Ok(visible)
}
