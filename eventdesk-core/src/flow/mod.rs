//! Multi-step create/edit/delete flows.
//!
//! A flow is created fresh for every command invocation and advanced one
//! [`Input`] at a time. Nothing is written before the final stage, and the
//! final stage always re-reads the collection from the store instead of
//! trusting the snapshot its menus were built from.

mod create;
mod delete;
mod edit;
mod view;

pub use create::{EventCreateFlow, ItemCreateFlow, create_event, create_item, created_message};
pub use delete::DeleteFlow;
pub use edit::EditFlow;
pub use view::{Form, FormInput, Input, Prompt, SelectMenu, SelectOption, Step};

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{DeskError, DeskResult};
use crate::ui::{Notice, Ui};

/// Where a flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EntitySelect,
    CategorySelect,
    FieldSelect,
    ValueSubmit,
    Committed,
    Aborted,
}

impl Stage {
    pub fn is_finished(self) -> bool {
        matches!(self, Stage::Committed | Stage::Aborted)
    }
}

pub trait Flow: Send {
    fn stage(&self) -> Stage;

    /// What to show for the current stage. `None` once finished.
    fn prompt(&self) -> Option<Prompt>;

    /// Advance with the user's answer to the current prompt.
    fn handle(&mut self, input: Input) -> DeskResult<Step>;
}

/// How a driven flow ended.
#[derive(Debug)]
pub enum FlowOutcome {
    Committed(String),
    /// The user dismissed a prompt or stopped answering; nothing was written
    Abandoned,
    /// The flow failed and was stopped; the user has been told why
    Aborted(DeskError),
}

/// Run `flow` to completion against `ui`.
///
/// Each wait for user input is bounded by `idle`. Rejected values are
/// shown and asked again; any other error ends the flow.
pub async fn drive<F, U>(flow: &mut F, ui: &mut U, idle: Duration) -> DeskResult<FlowOutcome>
where
    F: Flow + ?Sized,
    U: Ui + ?Sized,
{
    let Some(mut prompt) = flow.prompt() else {
        return Err(DeskError::FlowFinished);
    };

    loop {
        let input = match tokio::time::timeout(idle, ui.ask(&prompt)).await {
            Ok(answer) => answer?,
            Err(_) => {
                debug!("flow abandoned after {:?} without input", idle);
                return Ok(FlowOutcome::Abandoned);
            }
        };
        let Some(input) = input else {
            return Ok(FlowOutcome::Abandoned);
        };

        match flow.handle(input) {
            Ok(Step::Prompt(next)) => prompt = next,
            Ok(Step::Reprompt { reason, prompt: again }) => {
                ui.notify(&Notice::warning(format!("⚠️ {}", reason))).await?;
                prompt = again;
            }
            Ok(Step::Done(message)) => {
                ui.notify(&Notice::success(message.clone())).await?;
                return Ok(FlowOutcome::Committed(message));
            }
            Err(err) => {
                warn!("flow aborted: {}", err);
                ui.notify(&Notice::error(err.user_message())).await?;
                return Ok(FlowOutcome::Aborted(err));
            }
        }
    }
}
