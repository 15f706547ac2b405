use anyhow::Result;
use eventdesk_core::entity::Entity;
use eventdesk_core::flow::{DeleteFlow, EditFlow, ItemCreateFlow, create_item, created_message};
use eventdesk_core::item::{Category, ItemDraft, WorkItem};
use eventdesk_core::listing::{self, Pager};
use eventdesk_core::ui::Notice;
use eventdesk_core::validate;

use super::{Desk, nothing_to, run_flow};
use crate::render::Render;
use crate::ui::TerminalUi;

/// Add a work item directly when category, title and link are all given,
/// otherwise through the category menu and form.
pub async fn add(
    desk: &Desk,
    category: Option<String>,
    title: Option<String>,
    link: Option<String>,
) -> Result<()> {
    let category = category.as_deref().map(validate::category).transpose()?;

    if let (Some(category), Some(title), Some(link)) = (category, &title, &link) {
        let draft = ItemDraft {
            title: title.clone(),
            category: category.as_str().to_string(),
            link: link.clone(),
        };
        let (item, upsert) = create_item(desk.items.as_ref(), &draft)?;
        println!(
            "{}",
            Notice::success(created_message(WorkItem::KIND, &item.title, upsert)).render()
        );
        return Ok(());
    }

    let mut flow = ItemCreateFlow::new(desk.items.clone()).prefilled(ItemDraft {
        title: title.unwrap_or_default(),
        category: String::new(),
        link: link.unwrap_or_default(),
    });
    if let Some(category) = category {
        flow = flow.with_category(category);
    }
    run_flow(desk, &mut flow).await
}

pub async fn list(desk: &Desk, category: Option<&str>) -> Result<()> {
    let items = desk.items.load()?;
    let mut pager = Pager::new("🗂️ Work items", items, desk.config.page_size)
        .with_categories(Category::ALL.iter().map(|c| c.as_str()));

    if let Some(category) = category {
        let category = validate::category(category)?;
        pager.set_filter(Some(category.as_str()));
    }

    let mut ui = TerminalUi;
    listing::browse(&mut pager, &mut ui, desk.idle).await?;
    Ok(())
}

pub async fn edit(desk: &Desk) -> Result<()> {
    let mut flow = EditFlow::<WorkItem>::start(desk.items.clone())?;
    if flow.candidates() == 0 {
        nothing_to(WorkItem::KIND, "edit");
        return Ok(());
    }
    run_flow(desk, &mut flow).await
}

pub async fn delete(desk: &Desk) -> Result<()> {
    let mut flow = DeleteFlow::<WorkItem>::start(desk.items.clone())?;
    if flow.candidates() == 0 {
        nothing_to(WorkItem::KIND, "delete");
        return Ok(());
    }
    run_flow(desk, &mut flow).await
}
