//! Error types for eventdesk.

use std::path::PathBuf;

use thiserror::Error;

/// A single rejected field value.
///
/// Validation failures are recovered inside a flow by re-prompting, so
/// the messages here are written to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{0}' (expected DD/MM/YYYY)")]
    Date(String),

    #[error("Invalid time '{0}' (expected HH:MM, 24h)")]
    Time(String),

    #[error("Invalid access level '{0}' (expected member or sbx)")]
    Access(String),

    #[error("Invalid category '{0}' (expected one of {1})")]
    Category(String, String),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("'{0}' already exists")]
    DuplicateKey(String),

    #[error("Unknown time zone '{0}'")]
    TimeZone(String),
}

/// Errors that can occur in eventdesk operations.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("{}", join_reasons(.0))]
    Validation(Vec<ValidationError>),

    #[error("'{0}' is no longer available")]
    StaleSelection(String),

    #[error("Store I/O error at {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected input: {0}")]
    UnexpectedInput(String),

    #[error("Flow already finished")]
    FlowFinished,

    #[error("Prompt failed: {0}")]
    Interaction(String),
}

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        DeskError::Validation(vec![err])
    }
}

impl DeskError {
    /// Short message suitable for replying to the user that triggered the command.
    pub fn user_message(&self) -> String {
        match self {
            DeskError::Validation(_) => format!("⚠️ {}", self),
            DeskError::StaleSelection(key) => {
                format!("⚠️ '{}' is no longer available.", key)
            }
            DeskError::AccessDenied => "⚠️ You don't have access.".to_string(),
            DeskError::Config(_) => format!("⚠️ {}", self),
            DeskError::UnexpectedInput(_) | DeskError::FlowFinished => {
                "⚠️ That interaction has expired. Please run the command again.".to_string()
            }
            DeskError::StoreIo { .. }
            | DeskError::Serialization(_)
            | DeskError::Interaction(_) => {
                "⚠️ Something went wrong. Please try again later.".to_string()
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DeskError::Validation(_))
    }
}

fn join_reasons(reasons: &[ValidationError]) -> String {
    reasons
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for eventdesk operations.
pub type DeskResult<T> = Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reasons_are_joined() {
        let err = DeskError::Validation(vec![
            ValidationError::Date("31/02/2025".into()),
            ValidationError::Time("25:61".into()),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid date '31/02/2025' (expected DD/MM/YYYY); Invalid time '25:61' (expected HH:MM, 24h)"
        );
    }

    #[test]
    fn test_store_errors_hide_details_from_users() {
        let err = DeskError::StoreIo {
            path: PathBuf::from("/tmp/events.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!err.user_message().contains("disk full"));
        assert!(err.to_string().contains("disk full"));
    }
}
