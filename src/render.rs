//! Colored terminal rendering for eventdesk-core types.

use eventdesk_core::listing::{PageView, Row};
use eventdesk_core::sweeper::SweepReport;
use eventdesk_core::timezone::Conversion;
use eventdesk_core::ui::{Notice, NoticeLevel};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Notice {
    fn render(&self) -> String {
        let text = emphasize(&self.text);
        match self.level {
            NoticeLevel::Info => format!("  {}", text),
            NoticeLevel::Success => format!("  {}", text.green()),
            NoticeLevel::Warning => format!("  {}", text.yellow()),
            NoticeLevel::Error => format!("  {}", text.red()),
        }
    }
}

impl Render for Row {
    fn render(&self) -> String {
        format!(
            "  {} {} {}\n     {}",
            format!("{}.", self.index).dimmed(),
            self.title.bold(),
            format!("[{}]", self.category).cyan(),
            self.details.dimmed()
        )
    }
}

impl Render for PageView {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        let mut header = format!("  {}", self.title.bold());
        if let Some(filter) = &self.filter {
            header.push_str(&format!(" {}", format!("({})", filter).cyan()));
        }
        lines.push(header);

        if self.rows.is_empty() {
            lines.push(format!("  {}", "Nothing here yet.".dimmed()));
        } else {
            for row in &self.rows {
                lines.push(row.render());
            }
        }

        if self.page_count > 1 {
            lines.push(
                format!("  Page {}/{}", self.page + 1, self.page_count)
                    .dimmed()
                    .to_string(),
            );
        }

        lines.join("\n")
    }
}

impl Render for SweepReport {
    fn render(&self) -> String {
        if self.removed.is_empty() {
            return format!("  {}", "No past events.".dimmed());
        }
        let mut lines = vec![format!(
            "  {}",
            format!("Removed {} past event(s):", self.removed.len()).green()
        )];
        for name in &self.removed {
            lines.push(format!("   {} {}", "-".red(), name));
        }
        lines.join("\n")
    }
}

impl Render for Conversion {
    fn render(&self) -> String {
        format!(
            "  {} {} {} {}",
            self.source.format("%H:%M %Z"),
            "→".dimmed(),
            self.target.format("%H:%M %Z").bold(),
            self.target.format("(%a %d/%m)").dimmed()
        )
    }
}

/// Strip the `**bold**` markers used in flow messages, bolding the span instead.
fn emphasize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split("**").enumerate() {
        if i % 2 == 1 {
            out.push_str(&part.bold().to_string());
        } else {
            out.push_str(part);
        }
    }
    out
}
