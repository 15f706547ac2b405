//! Shared behaviour of the two record types.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ValidationError;

/// Identifies one mutable field of an entity schema.
///
/// Implemented by closed enums so every field's accessor, validator and
/// mutator is matched exhaustively.
pub trait FieldId: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every field, in the order the field picker shows them.
    const ALL: &'static [Self];

    /// Stored name of the field (JSON key and option value).
    fn name(self) -> &'static str;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// Whether this field is the entity's unique key.
    fn is_key(self) -> bool;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// A record stored in a collection and located by its unique key.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Field: FieldId;

    /// Singular noun used in prompts and confirmations.
    const KIND: &'static str;

    fn key(&self) -> &str;

    /// One-line description of the remaining fields.
    fn summary(&self) -> String;

    /// Current value of `field` in its editable form.
    fn field_value(&self, field: Self::Field) -> String;

    /// Validate `raw` for `field` and store it. Leaves `self` untouched on error.
    fn apply(&mut self, field: Self::Field, raw: &str) -> Result<(), ValidationError>;
}

/// Entities that can be filtered by a single categorical field.
pub trait Categorized {
    fn category(&self) -> &str;
}

/// What [`upsert`] did with the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

pub fn find<'a, T: Entity>(entities: &'a [T], key: &str) -> Option<&'a T> {
    entities.iter().find(|e| e.key() == key)
}

pub fn position<T: Entity>(entities: &[T], key: &str) -> Option<usize> {
    entities.iter().position(|e| e.key() == key)
}

/// Insert `entity`, or replace the entity that already has its key (last write wins).
pub fn upsert<T: Entity>(entities: &mut Vec<T>, entity: T) -> Upsert {
    match position(entities, entity.key()) {
        Some(i) => {
            entities[i] = entity;
            Upsert::Replaced
        }
        None => {
            entities.push(entity);
            Upsert::Inserted
        }
    }
}

/// Remove the entity with `key`, if present.
pub fn remove<T: Entity>(entities: &mut Vec<T>, key: &str) -> Option<T> {
    position(entities, key).map(|i| entities.remove(i))
}
