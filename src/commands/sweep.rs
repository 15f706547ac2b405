use anyhow::Result;
use chrono::Utc;
use eventdesk_core::sweeper::Sweeper;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::Desk;
use crate::render::Render;

pub fn once(desk: &Desk) -> Result<()> {
    let sweeper = Sweeper::new(desk.events.clone(), desk.config.sweep_interval()?);
    let report = sweeper.sweep(Utc::now())?;
    println!("{}", report.render());
    Ok(())
}

/// Run the sweeper until Ctrl-C.
pub async fn serve(desk: &Desk) -> Result<()> {
    let interval = desk.config.sweep_interval()?;
    let sweeper = Sweeper::new(desk.events.clone(), interval);

    let (ready_tx, ready_rx) = watch::channel(false);
    let cancel = CancellationToken::new();
    let handle = sweeper.spawn(ready_rx, cancel.clone());

    // Stores are resolved and the config is valid at this point.
    ready_tx.send(true)?;
    info!(
        store = %desk.config.events_path().display(),
        "serving, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();
    handle.await?;

    Ok(())
}
