//! Terminal implementation of the core [`Ui`] trait using dialoguer prompts.
//!
//! dialoguer blocks on stdin, so every prompt runs on the blocking pool and
//! the flow driver's idle timeout still applies.

use async_trait::async_trait;
use dialoguer::{Input as TextInput, Select};
use eventdesk_core::error::{DeskError, DeskResult};
use eventdesk_core::flow::{Form, Input, Prompt, SelectMenu};
use eventdesk_core::listing::{PageView, PagerAction};
use eventdesk_core::ui::{Notice, Ui};
use owo_colors::OwoColorize;

use crate::render::Render;

pub struct TerminalUi;

#[async_trait]
impl Ui for TerminalUi {
    async fn ask(&mut self, prompt: &Prompt) -> DeskResult<Option<Input>> {
        let prompt = prompt.clone();
        blocking(move || match &prompt {
            Prompt::Select(menu) => select(menu),
            Prompt::Form(form) => fill(form),
        })
        .await
    }

    async fn page(&mut self, view: &PageView) -> DeskResult<Option<PagerAction>> {
        println!();
        println!("{}", view.render());

        let actions = page_actions(view);
        blocking(move || {
            let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
            let choice = Select::new()
                .with_prompt("  Navigate")
                .items(&labels)
                .default(0)
                .interact_opt()
                .map_err(interaction)?;
            Ok(choice.map(|i| actions[i].1.clone()))
        })
        .await
    }

    async fn notify(&mut self, notice: &Notice) -> DeskResult<()> {
        println!("{}", notice.render());
        Ok(())
    }
}

async fn blocking<T, F>(prompt: F) -> DeskResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> DeskResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| DeskError::Interaction(e.to_string()))?
}

fn interaction(err: dialoguer::Error) -> DeskError {
    DeskError::Interaction(err.to_string())
}

fn select(menu: &SelectMenu) -> DeskResult<Option<Input>> {
    if menu.options.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = menu
        .options
        .iter()
        .map(|o| match &o.description {
            Some(description) => format!("{}  {}", o.label, description.dimmed()),
            None => o.label.clone(),
        })
        .collect();

    let choice = Select::new()
        .with_prompt(format!("  {}", menu.placeholder))
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(interaction)?;

    Ok(choice.map(|i| Input::Selected(menu.options[i].value.clone())))
}

fn fill(form: &Form) -> DeskResult<Option<Input>> {
    println!("{}", format!("  {}", form.title).bold());

    let mut values = Vec::with_capacity(form.inputs.len());
    for input in &form.inputs {
        let max_len = input.max_len;
        let mut prompt = TextInput::<String>::new()
            .with_prompt(format!("  {}", input.label))
            .allow_empty(true)
            .validate_with(move |value: &String| -> Result<(), String> {
                if value.chars().count() > max_len {
                    Err(format!("At most {} characters", max_len))
                } else {
                    Ok(())
                }
            });
        if let Some(default) = &input.default {
            prompt = prompt.with_initial_text(default.clone());
        }
        values.push(prompt.interact_text().map_err(interaction)?);
    }

    Ok(Some(Input::Submitted(values)))
}

/// Navigation choices for a page: neighbours first, then jumps, then filters.
fn page_actions(view: &PageView) -> Vec<(String, PagerAction)> {
    let mut actions = Vec::new();
    let labels = view.page_labels();

    if view.page + 1 < view.page_count {
        actions.push(("Next page".to_string(), PagerAction::Goto(view.page + 1)));
    }
    if view.page > 0 {
        actions.push(("Previous page".to_string(), PagerAction::Goto(view.page - 1)));
    }
    if view.page_count > 2 {
        for (page, label) in labels.into_iter().enumerate() {
            if page != view.page {
                actions.push((format!("Page {}", label), PagerAction::Goto(page)));
            }
        }
    }
    for category in &view.categories {
        if view.filter.as_deref() != Some(category.as_str()) {
            actions.push((
                format!("Only {}", category),
                PagerAction::Filter(Some(category.clone())),
            ));
        }
    }
    if view.filter.is_some() {
        actions.push(("Show all".to_string(), PagerAction::Filter(None)));
    }
    actions.push(("Close".to_string(), PagerAction::Close));

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(page: usize, page_count: usize, filter: Option<&str>) -> PageView {
        PageView {
            title: "Items".into(),
            page,
            page_count,
            rows: Vec::new(),
            filter: filter.map(String::from),
            categories: vec!["Testnet".into(), "Depin".into()],
        }
    }

    fn actions_of(view: &PageView) -> Vec<PagerAction> {
        page_actions(view).into_iter().map(|(_, a)| a).collect()
    }

    #[test]
    fn test_first_of_two_pages() {
        let actions = actions_of(&view(0, 2, None));
        assert_eq!(actions[0], PagerAction::Goto(1));
        assert!(!actions.contains(&PagerAction::Filter(None)));
        assert_eq!(actions.last(), Some(&PagerAction::Close));
    }

    #[test]
    fn test_active_filter_offers_show_all() {
        let actions = actions_of(&view(0, 1, Some("Depin")));
        assert!(actions.contains(&PagerAction::Filter(Some("Testnet".into()))));
        assert!(!actions.contains(&PagerAction::Filter(Some("Depin".into()))));
        assert!(actions.contains(&PagerAction::Filter(None)));
        assert!(!actions.iter().any(|a| matches!(a, PagerAction::Goto(_))));
    }

    #[test]
    fn test_many_pages_offer_jumps() {
        let actions = actions_of(&view(1, 4, None));
        assert!(actions.contains(&PagerAction::Goto(0)));
        assert!(actions.contains(&PagerAction::Goto(3)));
        assert!(!actions.contains(&PagerAction::Goto(1)));
    }
}
