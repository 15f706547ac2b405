//! Work-in-progress items ("garapan").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{Categorized, Entity, FieldId};
use crate::error::ValidationError;
use crate::validate;

/// A tracked piece of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique title
    #[serde(rename = "judul")]
    pub title: String,
    /// Canonical [`Category`] name. Kept as text so older documents load.
    #[serde(rename = "kategori")]
    pub category: String,
    /// Link to the discussion, not validated
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Testnet,
    Depin,
    Dapps,
}

impl Category {
    pub const ALL: &'static [Category] = &[Category::Testnet, Category::Depin, Category::Dapps];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Testnet => "Testnet",
            Category::Depin => "Depin",
            Category::Dapps => "Dapps",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Category,
    Link,
}

impl FieldId for ItemField {
    const ALL: &'static [Self] = &[ItemField::Title, ItemField::Category, ItemField::Link];

    fn name(self) -> &'static str {
        match self {
            ItemField::Title => "judul",
            ItemField::Category => "kategori",
            ItemField::Link => "link",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ItemField::Title => "Title",
            ItemField::Category => "Category",
            ItemField::Link => "Link",
        }
    }

    fn is_key(self) -> bool {
        self == ItemField::Title
    }
}

impl WorkItem {
    pub fn new(title: &str, category: Category, link: &str) -> Self {
        WorkItem {
            title: title.to_string(),
            category: category.as_str().to_string(),
            link: link.to_string(),
        }
    }
}

impl Entity for WorkItem {
    type Field = ItemField;

    const KIND: &'static str = "item";

    fn key(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> String {
        format!("{} · {}", self.category, self.link)
    }

    fn field_value(&self, field: ItemField) -> String {
        match field {
            ItemField::Title => self.title.clone(),
            ItemField::Category => self.category.clone(),
            ItemField::Link => self.link.clone(),
        }
    }

    fn apply(&mut self, field: ItemField, raw: &str) -> Result<(), ValidationError> {
        match field {
            ItemField::Title => self.title = validate::required("Title", raw)?,
            ItemField::Category => self.category = validate::category(raw)?.as_str().to_string(),
            ItemField::Link => self.link = validate::required("Link", raw)?,
        }
        Ok(())
    }
}

impl Categorized for WorkItem {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Unvalidated input for a new work item.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub title: String,
    pub category: String,
    pub link: String,
}

impl ItemDraft {
    pub fn validate(&self) -> Result<WorkItem, Vec<ValidationError>> {
        let title = validate::required("Title", &self.title);
        let category = validate::category(&self.category);
        let link = validate::required("Link", &self.link);

        match (title, category, link) {
            (Ok(title), Ok(category), Ok(link)) => Ok(WorkItem::new(&title, category, &link)),
            (title, category, link) => Err([title.err(), category.err(), link.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}
