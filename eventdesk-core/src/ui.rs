//! The rendering boundary.
//!
//! The host (a chat platform, a terminal) implements [`Ui`]; flows and
//! listings only ever talk to it through these three primitives plus
//! one-way notices.

use async_trait::async_trait;

use crate::error::DeskResult;
use crate::flow::{Input, Prompt};
use crate::listing::{PageView, PagerAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short, private message shown on the current interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait Ui: Send {
    /// Show a select list or form and wait for the answer.
    /// `None` means the user dismissed it.
    async fn ask(&mut self, prompt: &Prompt) -> DeskResult<Option<Input>>;

    /// Show one page of a listing and wait for a page or filter choice.
    async fn page(&mut self, view: &PageView) -> DeskResult<Option<PagerAction>>;

    async fn notify(&mut self, notice: &Notice) -> DeskResult<()>;
}
