//! Background removal of expired events.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::entity::Entity;
use crate::error::DeskResult;
use crate::event::Event;
use crate::store::Store;

/// Outcome of a single sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub kept: usize,
    /// Names of the removed events
    pub removed: Vec<String>,
}

impl SweepReport {
    pub fn wrote(&self) -> bool {
        !self.removed.is_empty()
    }
}

pub struct Sweeper {
    store: Arc<dyn Store<Event>>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(store: Arc<dyn Store<Event>>, interval: Duration) -> Self {
        Sweeper { store, interval }
    }

    /// Drop every event that started before `now`. The collection is only
    /// written back when something was removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> DeskResult<SweepReport> {
        let events = self.store.load()?;

        let (expired, kept): (Vec<Event>, Vec<Event>) =
            events.into_iter().partition(|e| e.is_expired(now));

        let report = SweepReport {
            kept: kept.len(),
            removed: expired.iter().map(|e| e.key().to_string()).collect(),
        };

        if report.wrote() {
            self.store.save(&kept)?;
        }

        Ok(report)
    }

    /// Start sweeping on a timer once `ready` turns true, until `cancel` fires.
    ///
    /// Ticks run inside the task one after another, so a slow sweep delays
    /// the next one instead of overlapping it.
    pub fn spawn(
        self,
        mut ready: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                started = async { ready.wait_for(|ready| *ready).await.is_ok() } => {
                    if !started {
                        debug!("readiness sender dropped, sweeper not started");
                        return;
                    }
                }
            }

            info!("sweeper started, every {:?}", self.interval);
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => self.tick(),
                }
            }

            info!("sweeper stopped");
        })
    }

    fn tick(&self) {
        match self.sweep(Utc::now()) {
            Ok(report) if report.wrote() => {
                info!(
                    removed = report.removed.len(),
                    kept = report.kept,
                    "expired events removed: {}",
                    report.removed.join(", ")
                );
            }
            Ok(report) => debug!(kept = report.kept, "nothing expired"),
            Err(e) => warn!("sweep failed, retrying next tick: {}", e),
        }
    }
}
