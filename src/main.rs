mod commands;
mod render;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use commands::{AlreadyReported, Desk};

#[derive(Parser)]
#[command(name = "eventdesk")]
#[command(about = "Manage scheduled events and work items through guided flows")]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scheduled events (AMAs, calls, launches)
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Work items grouped by category
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Remove every event whose start time has passed, once
    Sweep,
    /// Keep running and remove past events on a fixed interval
    Serve,
    /// Convert a time of day between two zones (e.g. "convert WIB PST 08:00")
    Convert {
        from: String,
        to: String,
        time: String,
    },
    /// List the supported time zone abbreviations
    Zones {
        /// Only show zones containing this text
        partial: Option<String>,
    },
}

#[derive(Subcommand)]
enum EventAction {
    /// Add an event. Missing fields are asked for interactively.
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        source: Option<String>,
        /// Day of the week, free text
        #[arg(long)]
        day: Option<String>,
        /// DD/MM/YYYY
        #[arg(long)]
        date: Option<String>,
        /// HH:MM, 24h
        #[arg(long)]
        time: Option<String>,
        /// member or sbx
        #[arg(long)]
        access: Option<String>,
    },
    /// Show upcoming events visible to the given roles
    List {
        /// Role held by the viewer (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },
    /// Pick an event, then a field, then enter the new value
    Edit,
    /// Pick an event and remove it
    Delete,
}

#[derive(Subcommand)]
enum ItemAction {
    /// Add a work item. Missing fields are asked for interactively.
    Add {
        /// Testnet, Depin or Dapps
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Browse work items page by page
    List {
        /// Start with this category filter applied
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Pick an item, then a field, then enter the new value
    Edit,
    /// Pick an item and remove it
    Delete,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(cli));

    // A prompt abandoned on idle timeout is still blocked reading stdin.
    runtime.shutdown_timeout(Duration::from_millis(100));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(message) = error_message(&e) {
                eprintln!("{}", message.red());
            }
            ExitCode::FAILURE
        }
    }
}

/// What to print for a failed command, if it has not been shown already.
fn error_message(err: &anyhow::Error) -> Option<String> {
    if err.is::<AlreadyReported>() {
        return None;
    }
    Some(format!("Error: {:#}", err))
}

async fn run(cli: Cli) -> Result<()> {
    let desk = || Desk::load(cli.config.as_deref());

    match cli.command {
        Commands::Event { action } => match action {
            EventAction::Add {
                name,
                source,
                day,
                date,
                time,
                access,
            } => {
                let fields = [name, source, day, date, time, access];
                commands::event::add(&desk()?, fields).await
            }
            EventAction::List { roles } => commands::event::list(&desk()?, &roles).await,
            EventAction::Edit => commands::event::edit(&desk()?).await,
            EventAction::Delete => commands::event::delete(&desk()?).await,
        },
        Commands::Item { action } => match action {
            ItemAction::Add {
                category,
                title,
                link,
            } => commands::item::add(&desk()?, category, title, link).await,
            ItemAction::List { category } => {
                commands::item::list(&desk()?, category.as_deref()).await
            }
            ItemAction::Edit => commands::item::edit(&desk()?).await,
            ItemAction::Delete => commands::item::delete(&desk()?).await,
        },
        Commands::Sweep => commands::sweep::once(&desk()?),
        Commands::Serve => commands::sweep::serve(&desk()?).await,
        Commands::Convert { from, to, time } => commands::convert::run(&from, &to, &time),
        Commands::Zones { partial } => commands::convert::zones(partial.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,eventdesk=info,eventdesk_core=info",
        1 => "eventdesk=debug,eventdesk_core=debug",
        _ => "eventdesk=trace,eventdesk_core=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_failure_is_not_printed_again() {
        let err: anyhow::Error = AlreadyReported.into();
        assert_eq!(error_message(&err), None);
    }

    #[test]
    fn test_other_failures_are_printed_with_context() {
        let err = anyhow::anyhow!("disk full").context("saving events");
        assert_eq!(error_message(&err).as_deref(), Some("Error: saving events: disk full"));
    }
}
