use anyhow::Result;
use eventdesk_core::entity::{Categorized, Entity};
use eventdesk_core::error::DeskError;
use eventdesk_core::event::{AccessLevel, Event, EventDraft};
use eventdesk_core::flow::{DeleteFlow, EditFlow, EventCreateFlow, create_event, created_message};
use eventdesk_core::listing::{self, Pager};
use eventdesk_core::ui::Notice;

use super::{Desk, nothing_to, run_flow};
use crate::render::Render;
use crate::ui::TerminalUi;

/// Add an event. With every field given on the command line the event is
/// written directly; otherwise the create form opens with the known fields.
pub async fn add(desk: &Desk, fields: [Option<String>; 6]) -> Result<()> {
    let complete = fields.iter().all(Option::is_some);
    let [name, source, weekday, date, time, access] = fields.map(Option::unwrap_or_default);
    let draft = EventDraft {
        name,
        source,
        weekday,
        date,
        time,
        access,
    };

    if complete {
        let (event, upsert) = create_event(desk.events.as_ref(), &draft)?;
        println!(
            "{}",
            Notice::success(created_message(Event::KIND, &event.name, upsert)).render()
        );
        return Ok(());
    }

    let mut flow = EventCreateFlow::new(desk.events.clone()).prefilled(draft);
    run_flow(desk, &mut flow).await
}

pub async fn list(desk: &Desk, roles: &[String]) -> Result<()> {
    let events = desk.events.load()?;
    let visible = match eventdesk_core::access::visible_events(events, roles, &desk.config.roles) {
        Ok(visible) => visible,
        Err(DeskError::AccessDenied) => {
            anyhow::bail!(
                "{}\n\nPass the roles you hold, e.g.:\n  eventdesk event list --role {}",
                DeskError::AccessDenied.user_message(),
                desk.config.roles.member
            );
        }
        Err(e) => return Err(e.into()),
    };

    // Offer an access filter only when more than one level is on screen.
    let levels: Vec<&str> = AccessLevel::ALL
        .iter()
        .map(|a| a.as_str())
        .filter(|level| visible.iter().any(|e| e.category() == *level))
        .collect();
    let categories = if levels.len() > 1 { levels } else { Vec::new() };

    let mut pager = Pager::new("📅 Events", visible, desk.config.page_size)
        .with_categories(categories);
    let mut ui = TerminalUi;
    if pager.page_count() == 1 && pager.view().categories.is_empty() {
        println!("{}", pager.view().render());
        return Ok(());
    }
    listing::browse(&mut pager, &mut ui, desk.idle).await?;
    Ok(())
}

pub async fn edit(desk: &Desk) -> Result<()> {
    let mut flow = EditFlow::<Event>::start(desk.events.clone())?;
    if flow.candidates() == 0 {
        nothing_to(Event::KIND, "edit");
        return Ok(());
    }
    run_flow(desk, &mut flow).await
}

pub async fn delete(desk: &Desk) -> Result<()> {
    let mut flow = DeleteFlow::<Event>::start(desk.events.clone())?;
    if flow.candidates() == 0 {
        nothing_to(Event::KIND, "delete");
        return Ok(());
    }
    run_flow(desk, &mut flow).await
}
