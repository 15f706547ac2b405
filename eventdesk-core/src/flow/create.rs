//! Creation flows and their non-interactive counterparts.
//!
//! Duplicate keys are resolved last-write-wins: creating an entity whose
//! key already exists replaces the stored one in place.

use std::sync::Arc;

use tracing::info;

use super::delete::capitalize;
use super::view::{Form, FormInput, Input, Prompt, SelectMenu, SelectOption, Step};
use super::{Flow, Stage};
use crate::entity::{self, Entity, FieldId, Upsert};
use crate::error::{DeskError, DeskResult, ValidationError};
use crate::event::{Event, EventDraft, EventField};
use crate::item::{Category, ItemDraft, WorkItem};
use crate::store::Store;

/// Validate `draft` and add the event, replacing any event with the same name.
pub fn create_event(store: &dyn Store<Event>, draft: &EventDraft) -> DeskResult<(Event, Upsert)> {
    let event = draft.validate().map_err(DeskError::Validation)?;
    let upsert = commit_new(store, event.clone())?;
    Ok((event, upsert))
}

/// Validate `draft` and add the item, replacing any item with the same title.
pub fn create_item(
    store: &dyn Store<WorkItem>,
    draft: &ItemDraft,
) -> DeskResult<(WorkItem, Upsert)> {
    let item = draft.validate().map_err(DeskError::Validation)?;
    let upsert = commit_new(store, item.clone())?;
    Ok((item, upsert))
}

fn commit_new<T: Entity>(store: &dyn Store<T>, entity: T) -> DeskResult<Upsert> {
    let mut fresh = store.load()?;
    let key = entity.key().to_string();
    let upsert = entity::upsert(&mut fresh, entity);
    store.save(&fresh)?;
    info!("{} '{}' {:?}", T::KIND, key, upsert);
    Ok(upsert)
}

/// Confirmation shown after a create, e.g. "✅ Event **AMA** added."
pub fn created_message(kind: &str, key: &str, upsert: Upsert) -> String {
    match upsert {
        Upsert::Inserted => format!("✅ {} **{}** added.", capitalize(kind), key),
        Upsert::Replaced => format!("✅ {} **{}** replaced.", capitalize(kind), key),
    }
}

fn reasons(errors: &[ValidationError]) -> String {
    DeskError::Validation(errors.to_vec()).to_string()
}

// =============================================================================
// Event: one form with every field
// =============================================================================

pub struct EventCreateFlow {
    store: Arc<dyn Store<Event>>,
    initial: EventDraft,
    stage: Stage,
}

impl EventCreateFlow {
    pub fn new(store: Arc<dyn Store<Event>>) -> Self {
        EventCreateFlow {
            store,
            initial: EventDraft::default(),
            stage: Stage::ValueSubmit,
        }
    }

    /// Open the form with the non-empty fields of `draft` already filled in.
    pub fn prefilled(mut self, draft: EventDraft) -> Self {
        self.initial = draft;
        self
    }

    fn form(&self) -> Form {
        Form {
            title: "New event".to_string(),
            inputs: EventField::ALL
                .iter()
                .zip(self.initial.values())
                .map(|(field, value)| {
                    let input = FormInput::new(field.label());
                    if value.is_empty() {
                        input
                    } else {
                        input.with_default(value)
                    }
                })
                .collect(),
        }
    }
}

impl Flow for EventCreateFlow {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn prompt(&self) -> Option<Prompt> {
        (self.stage == Stage::ValueSubmit).then(|| Prompt::Form(self.form()))
    }

    fn handle(&mut self, input: Input) -> DeskResult<Step> {
        if self.stage.is_finished() {
            return Err(DeskError::FlowFinished);
        }
        let values = match input {
            Input::Submitted(values) => values,
            other => return Err(DeskError::UnexpectedInput(format!("{:?}", other))),
        };

        let draft = EventDraft::from_values(&values);
        let event = match draft.validate() {
            Ok(event) => event,
            Err(errors) => {
                return Ok(Step::Reprompt {
                    reason: reasons(&errors),
                    prompt: Prompt::Form(self.form().refilled(&values)),
                });
            }
        };

        self.stage = Stage::Aborted;
        let key = event.name.clone();
        let upsert = commit_new(self.store.as_ref(), event)?;
        self.stage = Stage::Committed;

        Ok(Step::Done(created_message(Event::KIND, &key, upsert)))
    }
}

// =============================================================================
// Work item: pick a category, then fill title and link
// =============================================================================

pub struct ItemCreateFlow {
    store: Arc<dyn Store<WorkItem>>,
    category: Option<Category>,
    initial: ItemDraft,
    stage: Stage,
}

impl ItemCreateFlow {
    pub fn new(store: Arc<dyn Store<WorkItem>>) -> Self {
        ItemCreateFlow {
            store,
            category: None,
            initial: ItemDraft::default(),
            stage: Stage::CategorySelect,
        }
    }

    /// Open the form with a known title and/or link already filled in.
    pub fn prefilled(mut self, draft: ItemDraft) -> Self {
        self.initial = draft;
        self
    }

    /// Skip the category menu when the category is already known.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self.stage = Stage::ValueSubmit;
        self
    }

    fn category_menu() -> SelectMenu {
        SelectMenu {
            placeholder: "Choose a category".to_string(),
            options: Category::ALL
                .iter()
                .map(|c| SelectOption {
                    label: c.as_str().to_string(),
                    value: c.as_str().to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    fn form(&self, category: Category) -> Form {
        let input = |label: &str, known: &str| {
            let input = FormInput::new(label);
            if known.is_empty() {
                input
            } else {
                input.with_default(known)
            }
        };
        Form {
            title: format!("New {} item", category),
            inputs: vec![
                input("Title", &self.initial.title),
                input("Link", &self.initial.link),
            ],
        }
    }
}

impl Flow for ItemCreateFlow {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn prompt(&self) -> Option<Prompt> {
        match (self.stage, self.category) {
            (Stage::CategorySelect, _) => Some(Prompt::Select(Self::category_menu())),
            (Stage::ValueSubmit, Some(category)) => Some(Prompt::Form(self.form(category))),
            _ => None,
        }
    }

    fn handle(&mut self, input: Input) -> DeskResult<Step> {
        match (self.stage, self.category, input) {
            (Stage::CategorySelect, _, Input::Selected(value)) => match value.parse::<Category>() {
                Ok(category) => {
                    self.category = Some(category);
                    self.stage = Stage::ValueSubmit;
                    Ok(Step::Prompt(Prompt::Form(self.form(category))))
                }
                Err(()) => Ok(Step::Reprompt {
                    reason: crate::validate::category(&value)
                        .err()
                        .map(|e| e.to_string())
                        .unwrap_or_default(),
                    prompt: Prompt::Select(Self::category_menu()),
                }),
            },
            (Stage::ValueSubmit, Some(category), Input::Submitted(values)) => {
                let draft = ItemDraft {
                    title: values.first().cloned().unwrap_or_default(),
                    category: category.as_str().to_string(),
                    link: values.get(1).cloned().unwrap_or_default(),
                };
                let item = match draft.validate() {
                    Ok(item) => item,
                    Err(errors) => {
                        return Ok(Step::Reprompt {
                            reason: reasons(&errors),
                            prompt: Prompt::Form(self.form(category).refilled(&values)),
                        });
                    }
                };

                self.stage = Stage::Aborted;
                let key = item.title.clone();
                let upsert = commit_new(self.store.as_ref(), item)?;
                self.stage = Stage::Committed;

                Ok(Step::Done(created_message(WorkItem::KIND, &key, upsert)))
            }
            (stage, _, _) if stage.is_finished() => Err(DeskError::FlowFinished),
            (_, _, input) => Err(DeskError::UnexpectedInput(format!("{:?}", input))),
        }
    }
}
