//! Entity → field → value edit flow.

use std::sync::Arc;

use tracing::{info, warn};

use super::view::{Form, FormInput, Input, Prompt, SelectMenu, Step};
use super::{Flow, Stage};
use crate::entity::{self, Entity, FieldId};
use crate::error::{DeskError, DeskResult, ValidationError};
use crate::store::Store;

enum EditStage<T: Entity> {
    EntitySelect { snapshot: Vec<T> },
    FieldSelect { entity: T },
    ValueSubmit { entity: T, field: T::Field },
    Committed,
    Aborted,
}

/// Edits one field of one entity.
pub struct EditFlow<T: Entity> {
    store: Arc<dyn Store<T>>,
    stage: EditStage<T>,
}

impl<T: Entity> EditFlow<T> {
    /// Snapshot the collection to build the entity menu from.
    pub fn start(store: Arc<dyn Store<T>>) -> DeskResult<Self> {
        let snapshot = store.load()?;
        Ok(EditFlow {
            store,
            stage: EditStage::EntitySelect { snapshot },
        })
    }

    /// Number of entities offered by the first menu.
    pub fn candidates(&self) -> usize {
        match &self.stage {
            EditStage::EntitySelect { snapshot } => snapshot.len(),
            _ => 0,
        }
    }

    fn value_form(entity: &T, field: T::Field) -> Form {
        Form {
            title: format!("Edit {} – {}", field.label(), entity.key()),
            inputs: vec![FormInput::new("New value").with_default(entity.field_value(field))],
        }
    }

    /// Validate `raw` and write it to a freshly loaded copy of the entity.
    fn commit(
        &self,
        entity: &T,
        field: T::Field,
        raw: &str,
    ) -> DeskResult<Result<String, ValidationError>> {
        let mut probe = entity.clone();
        if let Err(reason) = probe.apply(field, raw) {
            return Ok(Err(reason));
        }

        let mut fresh = self.store.load()?;
        let Some(index) = entity::position(&fresh, entity.key()) else {
            warn!("{} '{}' disappeared before commit", T::KIND, entity.key());
            return Err(DeskError::StaleSelection(entity.key().to_string()));
        };

        if field.is_key()
            && probe.key() != entity.key()
            && entity::find(&fresh, probe.key()).is_some()
        {
            return Ok(Err(ValidationError::DuplicateKey(probe.key().to_string())));
        }

        fresh[index].apply(field, raw)?;
        self.store.save(&fresh)?;

        info!("{} '{}' field {} updated", T::KIND, entity.key(), field.name());
        Ok(Ok(format!(
            "✅ `{}` of {} **{}** updated.",
            field.name(),
            T::KIND,
            entity.key()
        )))
    }
}

impl<T: Entity> Flow for EditFlow<T> {
    fn stage(&self) -> Stage {
        match self.stage {
            EditStage::EntitySelect { .. } => Stage::EntitySelect,
            EditStage::FieldSelect { .. } => Stage::FieldSelect,
            EditStage::ValueSubmit { .. } => Stage::ValueSubmit,
            EditStage::Committed => Stage::Committed,
            EditStage::Aborted => Stage::Aborted,
        }
    }

    fn prompt(&self) -> Option<Prompt> {
        match &self.stage {
            EditStage::EntitySelect { snapshot } => Some(Prompt::Select(SelectMenu::for_entities(
                format!("Choose the {} to edit", T::KIND),
                snapshot,
            ))),
            EditStage::FieldSelect { .. } => Some(Prompt::Select(SelectMenu::for_fields::<T::Field>(
                "Choose the field to change",
            ))),
            EditStage::ValueSubmit { entity, field } => {
                Some(Prompt::Form(Self::value_form(entity, *field)))
            }
            EditStage::Committed | EditStage::Aborted => None,
        }
    }

    fn handle(&mut self, input: Input) -> DeskResult<Step> {
        let stage = std::mem::replace(&mut self.stage, EditStage::Aborted);

        match (stage, input) {
            (EditStage::EntitySelect { snapshot }, Input::Selected(key)) => {
                let Some(entity) = entity::find(&snapshot, &key).cloned() else {
                    return Err(DeskError::StaleSelection(key));
                };
                self.stage = EditStage::FieldSelect { entity };
            }
            (EditStage::FieldSelect { entity }, Input::Selected(name)) => {
                let Some(field) = T::Field::from_name(&name) else {
                    self.stage = EditStage::FieldSelect { entity };
                    return Err(DeskError::UnexpectedInput(format!("unknown field '{}'", name)));
                };
                self.stage = EditStage::ValueSubmit { entity, field };
            }
            (EditStage::ValueSubmit { entity, field }, Input::Submitted(values)) => {
                let raw = values.first().map(String::as_str).unwrap_or("").trim();

                match self.commit(&entity, field, raw)? {
                    Ok(message) => {
                        self.stage = EditStage::Committed;
                        return Ok(Step::Done(message));
                    }
                    Err(reason) => {
                        let prompt =
                            Prompt::Form(Self::value_form(&entity, field).refilled(&values));
                        self.stage = EditStage::ValueSubmit { entity, field };
                        return Ok(Step::Reprompt {
                            reason: reason.to_string(),
                            prompt,
                        });
                    }
                }
            }
            (finished @ (EditStage::Committed | EditStage::Aborted), _) => {
                self.stage = finished;
                return Err(DeskError::FlowFinished);
            }
            (stage, input) => {
                self.stage = stage;
                return Err(DeskError::UnexpectedInput(format!("{:?}", input)));
            }
        }

        self.prompt()
            .map(Step::Prompt)
            .ok_or(DeskError::FlowFinished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AccessLevel, Event, EventField};
    use crate::item::{Category, ItemField, WorkItem};
    use crate::store::JsonStore;

    fn make_event(name: &str) -> Event {
        Event {
            name: name.to_string(),
            source: "Discord".to_string(),
            weekday: "Senin".to_string(),
            date: "05/05/2099".to_string(),
            time: "10:00".to_string(),
            access: AccessLevel::Sbx,
        }
    }

    fn event_store(events: &[Event]) -> (tempfile::TempDir, Arc<JsonStore<Event>>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("events.json")));
        store.save(events).unwrap();
        (dir, store)
    }

    fn submit(value: &str) -> Input {
        Input::Submitted(vec![value.to_string()])
    }

    #[test]
    fn test_edit_time_happy_path() {
        let (_dir, store) = event_store(&[make_event("AMA"), make_event("Launch")]);
        let mut flow = EditFlow::<Event>::start(store.clone()).unwrap();
        assert_eq!(flow.candidates(), 2);

        flow.handle(Input::Selected("Launch".into())).unwrap();
        assert_eq!(flow.stage(), Stage::FieldSelect);

        let step = flow.handle(Input::Selected(EventField::Time.name().into())).unwrap();
        assert_eq!(flow.stage(), Stage::ValueSubmit);
        let Step::Prompt(Prompt::Form(form)) = step else {
            panic!("expected value form");
        };
        assert_eq!(form.inputs[0].default.as_deref(), Some("10:00"));

        let step = flow.handle(submit(" 18:30 ")).unwrap();
        assert!(matches!(step, Step::Done(_)));
        assert_eq!(flow.stage(), Stage::Committed);

        let events = store.load().unwrap();
        assert_eq!(events[1].time, "18:30");
        assert_eq!(events[0].time, "10:00");
    }

    #[test]
    fn test_invalid_value_reprompts_without_writing() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store.clone()).unwrap();
        flow.handle(Input::Selected("AMA".into())).unwrap();
        flow.handle(Input::Selected("jam".into())).unwrap();

        let step = flow.handle(submit("25:61")).unwrap();
        let Step::Reprompt { reason, prompt: Prompt::Form(form) } = step else {
            panic!("expected reprompt");
        };
        assert!(reason.contains("25:61"));
        assert_eq!(form.inputs[0].default.as_deref(), Some("25:61"));
        assert_eq!(flow.stage(), Stage::ValueSubmit);
        assert_eq!(store.load().unwrap()[0].time, "10:00");

        flow.handle(submit("11:00")).unwrap();
        assert_eq!(store.load().unwrap()[0].time, "11:00");
    }

    #[test]
    fn test_access_form_strips_sigil_and_stores_it() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store.clone()).unwrap();
        flow.handle(Input::Selected("AMA".into())).unwrap();
        let step = flow.handle(Input::Selected("akses".into())).unwrap();
        let Step::Prompt(Prompt::Form(form)) = step else {
            panic!("expected value form");
        };
        assert_eq!(form.inputs[0].default.as_deref(), Some("sbx"));

        flow.handle(submit("MEMBER")).unwrap();
        assert_eq!(store.load().unwrap()[0].access, AccessLevel::Member);
    }

    #[test]
    fn test_entity_deleted_after_render_is_stale() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store.clone()).unwrap();
        flow.handle(Input::Selected("AMA".into())).unwrap();
        flow.handle(Input::Selected("sumber".into())).unwrap();

        store.save(&[]).unwrap();

        let err = flow.handle(submit("Twitter")).unwrap_err();
        assert!(matches!(err, DeskError::StaleSelection(ref key) if key == "AMA"));
        assert_eq!(flow.stage(), Stage::Aborted);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_selection_missing_from_snapshot_is_stale() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store).unwrap();
        let err = flow.handle(Input::Selected("Ghost".into())).unwrap_err();
        assert!(matches!(err, DeskError::StaleSelection(_)));
        assert!(flow.prompt().is_none());
    }

    #[test]
    fn test_commit_keeps_concurrent_changes() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store.clone()).unwrap();
        flow.handle(Input::Selected("AMA".into())).unwrap();
        flow.handle(Input::Selected("hari".into())).unwrap();

        // Another turn adds an event between render and commit.
        store.save(&[make_event("AMA"), make_event("Late")]).unwrap();

        flow.handle(submit("Selasa")).unwrap();
        let events = store.load().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].weekday, "Selasa");
    }

    #[test]
    fn test_rename_onto_existing_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("garapan.json")));
        store
            .save(&[
                WorkItem::new("A", Category::Testnet, "x"),
                WorkItem::new("B", Category::Depin, "y"),
            ])
            .unwrap();

        let mut flow = EditFlow::<WorkItem>::start(store.clone()).unwrap();
        flow.handle(Input::Selected("A".into())).unwrap();
        flow.handle(Input::Selected(ItemField::Title.name().into())).unwrap();

        let step = flow.handle(submit("B")).unwrap();
        assert!(matches!(step, Step::Reprompt { .. }));
        assert_eq!(store.load().unwrap()[0].title, "A");

        flow.handle(submit("C")).unwrap();
        assert_eq!(store.load().unwrap()[0].title, "C");
    }

    #[test]
    fn test_wrong_input_kind_is_rejected() {
        let (_dir, store) = event_store(&[make_event("AMA")]);
        let mut flow = EditFlow::<Event>::start(store).unwrap();
        let err = flow.handle(submit("AMA")).unwrap_err();
        assert!(matches!(err, DeskError::UnexpectedInput(_)));
        assert_eq!(flow.stage(), Stage::EntitySelect);
    }
}
