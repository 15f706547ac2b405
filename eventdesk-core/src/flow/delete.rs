//! Pick-and-remove flow.

use std::sync::Arc;

use tracing::info;

use super::view::{Input, Prompt, SelectMenu, Step};
use super::{Flow, Stage};
use crate::entity::{self, Entity};
use crate::error::{DeskError, DeskResult};
use crate::store::Store;

pub struct DeleteFlow<T: Entity> {
    store: Arc<dyn Store<T>>,
    snapshot: Vec<T>,
    stage: Stage,
}

impl<T: Entity> DeleteFlow<T> {
    pub fn start(store: Arc<dyn Store<T>>) -> DeskResult<Self> {
        let snapshot = store.load()?;
        Ok(DeleteFlow {
            store,
            snapshot,
            stage: Stage::EntitySelect,
        })
    }

    pub fn candidates(&self) -> usize {
        self.snapshot.len()
    }
}

impl<T: Entity> Flow for DeleteFlow<T> {
    fn stage(&self) -> Stage {
        self.stage
    }

    fn prompt(&self) -> Option<Prompt> {
        (self.stage == Stage::EntitySelect).then(|| {
            Prompt::Select(SelectMenu::for_entities(
                format!("Choose the {} to delete", T::KIND),
                &self.snapshot,
            ))
        })
    }

    fn handle(&mut self, input: Input) -> DeskResult<Step> {
        if self.stage.is_finished() {
            return Err(DeskError::FlowFinished);
        }
        let key = match input {
            Input::Selected(key) => key,
            other => return Err(DeskError::UnexpectedInput(format!("{:?}", other))),
        };
        if entity::find(&self.snapshot, &key).is_none() {
            return Err(DeskError::UnexpectedInput(format!("'{}' was not offered", key)));
        }

        self.stage = Stage::Aborted;

        let mut fresh = self.store.load()?;
        if entity::remove(&mut fresh, &key).is_none() {
            return Err(DeskError::StaleSelection(key));
        }
        self.store.save(&fresh)?;
        self.stage = Stage::Committed;

        info!("{} '{}' deleted", T::KIND, key);
        Ok(Step::Done(format!("✅ {} **{}** deleted.", capitalize(T::KIND), key)))
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Category, WorkItem};
    use crate::store::JsonStore;

    fn item_store(titles: &[&str]) -> (tempfile::TempDir, Arc<JsonStore<WorkItem>>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStore::new(dir.path().join("garapan.json")));
        let items: Vec<WorkItem> = titles
            .iter()
            .map(|t| WorkItem::new(t, Category::Testnet, "https://x"))
            .collect();
        store.save(&items).unwrap();
        (dir, store)
    }

    #[test]
    fn test_delete_removes_only_selected() {
        let (_dir, store) = item_store(&["A", "B", "C"]);
        let mut flow = DeleteFlow::<WorkItem>::start(store.clone()).unwrap();

        let Some(Prompt::Select(menu)) = flow.prompt() else {
            panic!("expected select");
        };
        assert_eq!(menu.options.len(), 3);
        assert_eq!(menu.options[0].description.as_deref(), Some("Testnet · https://x"));

        let step = flow.handle(Input::Selected("B".into())).unwrap();
        assert_eq!(step, Step::Done("✅ Item **B** deleted.".into()));

        let titles: Vec<String> = store.load().unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(flow.prompt().is_none());
    }

    #[test]
    fn test_delete_reads_fresh_collection() {
        let (_dir, store) = item_store(&["A", "B"]);
        let mut flow = DeleteFlow::<WorkItem>::start(store.clone()).unwrap();

        store
            .save(&[
                WorkItem::new("A", Category::Testnet, "https://x"),
                WorkItem::new("B", Category::Testnet, "https://x"),
                WorkItem::new("New", Category::Dapps, "https://y"),
            ])
            .unwrap();

        flow.handle(Input::Selected("A".into())).unwrap();
        let titles: Vec<String> = store.load().unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["B", "New"]);
    }

    #[test]
    fn test_delete_of_vanished_entity_is_stale() {
        let (_dir, store) = item_store(&["A"]);
        let mut flow = DeleteFlow::<WorkItem>::start(store.clone()).unwrap();
        store.save(&[]).unwrap();

        let err = flow.handle(Input::Selected("A".into())).unwrap_err();
        assert!(matches!(err, DeskError::StaleSelection(_)));
        assert_eq!(flow.stage(), Stage::Aborted);
    }

    #[test]
    fn test_delete_rejects_key_missing_from_menu() {
        let (_dir, store) = item_store(&["A"]);
        let mut flow = DeleteFlow::<WorkItem>::start(store.clone()).unwrap();
        store
            .save(&[
                WorkItem::new("A", Category::Testnet, "https://x"),
                WorkItem::new("Late", Category::Testnet, "https://x"),
            ])
            .unwrap();

        let err = flow.handle(Input::Selected("Late".into())).unwrap_err();
        assert!(matches!(err, DeskError::UnexpectedInput(_)));
        assert_eq!(flow.stage(), Stage::EntitySelect);

        let titles: Vec<String> = store.load().unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["A", "Late"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("event"), "Event");
        assert_eq!(capitalize(""), "");
    }
}
