pub mod convert;
pub mod event;
pub mod item;
pub mod sweep;

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use eventdesk_core::config::DeskConfig;
use eventdesk_core::event::Event;
use eventdesk_core::flow::{self, Flow, FlowOutcome};
use eventdesk_core::item::WorkItem;
use eventdesk_core::store::Store;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::ui::TerminalUi;

/// Loaded configuration and the stores it points at.
pub struct Desk {
    pub config: DeskConfig,
    pub events: Arc<dyn Store<Event>>,
    pub items: Arc<dyn Store<WorkItem>>,
    /// How long a prompt may wait for the user before the flow is dropped
    pub idle: Duration,
}

impl Desk {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => DeskConfig::load_from(path)?,
            None => DeskConfig::load()?,
        };
        let idle = config.flow_timeout()?;

        debug!(
            events = %config.events_path().display(),
            items = %config.items_path().display(),
            "stores resolved"
        );

        Ok(Desk {
            events: Arc::new(config.event_store()),
            items: Arc::new(config.item_store()),
            idle,
            config,
        })
    }
}

/// Drive `flow` on the terminal. Failures have already been shown to the
/// user by the time they are returned here.
pub async fn run_flow<F: Flow>(desk: &Desk, flow: &mut F) -> Result<()> {
    let mut ui = TerminalUi;
    match flow::drive(flow, &mut ui, desk.idle).await? {
        FlowOutcome::Committed(_) => Ok(()),
        FlowOutcome::Abandoned => {
            println!();
            println!("{}", "  Nothing changed.".dimmed());
            Ok(())
        }
        FlowOutcome::Aborted(err) => {
            debug!("flow aborted: {}", err);
            Err(AlreadyReported.into())
        }
    }
}

/// The failure was already shown to the user; exit non-zero without repeating it.
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("already reported")
    }
}

impl std::error::Error for AlreadyReported {}

pub fn nothing_to(kind: &str, verb: &str) {
    println!("  {}", format!("There are no {}s to {}.", kind, verb).dimmed());
}
