use anyhow::Result;
use chrono::Local;
use eventdesk_core::error::ValidationError;
use eventdesk_core::timezone;
use owo_colors::OwoColorize;

use crate::render::Render;

/// Convert `time` (HH:MM) in zone `from` to zone `to`, on today's date.
pub fn run(from: &str, to: &str, time: &str) -> Result<()> {
    let today = Local::now().date_naive();
    match timezone::convert(from, to, time, today) {
        Ok(conversion) => {
            println!("{}", conversion.render());
            Ok(())
        }
        Err(ValidationError::TimeZone(unknown)) => {
            let prefix: String = unknown.chars().take(2).collect();
            let hints = timezone::suggest(&prefix);
            if hints.is_empty() {
                anyhow::bail!(
                    "Unknown time zone '{}'. Run `eventdesk zones` for the list.",
                    unknown
                );
            }
            anyhow::bail!("Unknown time zone '{}'. Did you mean: {}", unknown, hints.join(", "));
        }
        Err(e) => Err(e.into()),
    }
}

pub fn zones(partial: Option<&str>) -> Result<()> {
    let names = match partial {
        Some(partial) => timezone::suggest(partial),
        None => timezone::suggest(""),
    };
    if names.is_empty() {
        println!("  {}", "No matching zones.".dimmed());
        return Ok(());
    }
    for name in names {
        if let Some(tz) = timezone::lookup(name) {
            println!("  {:<6} {}", name.bold(), tz.name().dimmed());
        }
    }
    Ok(())
}
