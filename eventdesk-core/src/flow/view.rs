//! Data exchanged between a flow and whatever renders it.

use crate::constants::MAX_INPUT_LEN;
use crate::entity::{Entity, FieldId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    /// Returned in [`Input::Selected`] when picked
    pub value: String,
    pub description: Option<String>,
}

/// A single-choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    pub placeholder: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub label: String,
    pub default: Option<String>,
    pub max_len: usize,
}

/// A short free-text form. Submissions return one value per input, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Select(SelectMenu),
    Form(Form),
}

/// What the user did with a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Selected(String),
    Submitted(Vec<String>),
}

/// Result of feeding one [`Input`] to a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Advanced to a new stage
    Prompt(Prompt),
    /// Input was rejected; the same stage is asked again
    Reprompt { reason: String, prompt: Prompt },
    /// Mutation committed, with a confirmation for the user
    Done(String),
}

impl SelectMenu {
    /// One option per entity: label is the key, description the summary.
    pub fn for_entities<T: Entity>(placeholder: impl Into<String>, entities: &[T]) -> Self {
        SelectMenu {
            placeholder: placeholder.into(),
            options: entities
                .iter()
                .map(|e| SelectOption {
                    label: e.key().to_string(),
                    value: e.key().to_string(),
                    description: Some(e.summary()),
                })
                .collect(),
        }
    }

    /// One option per mutable field of `F`.
    pub fn for_fields<F: FieldId>(placeholder: impl Into<String>) -> Self {
        SelectMenu {
            placeholder: placeholder.into(),
            options: F::ALL
                .iter()
                .map(|f| SelectOption {
                    label: f.label().to_string(),
                    value: f.name().to_string(),
                    description: None,
                })
                .collect(),
        }
    }
}

impl FormInput {
    pub fn new(label: impl Into<String>) -> Self {
        FormInput {
            label: label.into(),
            default: None,
            max_len: MAX_INPUT_LEN,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl Form {
    /// Same form, pre-filled with what the user just submitted.
    pub fn refilled(&self, values: &[String]) -> Form {
        let mut form = self.clone();
        for (input, value) in form.inputs.iter_mut().zip(values) {
            input.default = Some(value.clone());
        }
        form
    }
}
