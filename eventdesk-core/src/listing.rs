//! Paged, filterable read-only views.
//!
//! A [`Pager`] owns an in-memory copy of a collection for its whole
//! lifetime. Paging and filtering never go back to the store.

use std::time::Duration;

use crate::entity::{Categorized, Entity};
use crate::error::DeskResult;
use crate::ui::Ui;

/// A user choice on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerAction {
    /// Jump to a zero-based page
    Goto(usize),
    /// Filter by category; `None` shows everything
    Filter(Option<String>),
    Close,
}

/// One numbered row of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// One-based position within the filtered set
    pub index: usize,
    pub title: String,
    pub category: String,
    pub details: String,
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: String,
    /// Zero-based
    pub page: usize,
    pub page_count: usize,
    pub rows: Vec<Row>,
    pub filter: Option<String>,
    /// Categories offered by the filter control
    pub categories: Vec<String>,
}

impl PageView {
    /// Button labels, one per page.
    pub fn page_labels(&self) -> Vec<String> {
        (1..=self.page_count).map(|n| n.to_string()).collect()
    }
}

pub struct Pager<T> {
    title: String,
    all: Vec<T>,
    visible: Vec<usize>,
    page_size: usize,
    page: usize,
    filter: Option<String>,
    categories: Vec<String>,
}

impl<T: Entity + Categorized> Pager<T> {
    pub fn new(title: impl Into<String>, entities: Vec<T>, page_size: usize) -> Self {
        let visible = (0..entities.len()).collect();
        Pager {
            title: title.into(),
            all: entities,
            visible,
            page_size: page_size.max(1),
            page: 0,
            filter: None,
            categories: Vec::new(),
        }
    }

    /// Categories offered by the filter control.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Pages in the filtered set; at least one even when empty.
    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Move to `page`, clamped to the last page.
    pub fn goto(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    /// Re-slice by case-insensitive category equality and return to the
    /// first page. Returns whether the page count changed.
    pub fn set_filter(&mut self, category: Option<&str>) -> bool {
        let before = self.page_count();

        self.filter = category.map(str::to_string);
        self.visible = self
            .all
            .iter()
            .enumerate()
            .filter(|(_, e)| match category {
                Some(c) => e.category().eq_ignore_ascii_case(c),
                None => true,
            })
            .map(|(i, _)| i)
            .collect();
        self.page = 0;

        before != self.page_count()
    }

    /// Entities on the current page.
    pub fn items(&self) -> Vec<&T> {
        self.visible
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|&i| &self.all[i])
            .collect()
    }

    pub fn view(&self) -> PageView {
        let start = self.page * self.page_size;
        PageView {
            title: self.title.clone(),
            page: self.page,
            page_count: self.page_count(),
            rows: self
                .items()
                .into_iter()
                .enumerate()
                .map(|(n, e)| Row {
                    index: start + n + 1,
                    title: e.key().to_string(),
                    category: e.category().to_string(),
                    details: e.summary(),
                })
                .collect(),
            filter: self.filter.clone(),
            categories: self.categories.clone(),
        }
    }

    pub fn apply(&mut self, action: &PagerAction) {
        match action {
            PagerAction::Goto(page) => self.goto(*page),
            PagerAction::Filter(category) => {
                self.set_filter(category.as_deref());
            }
            PagerAction::Close => {}
        }
    }
}

/// Show pages until the user closes the view or stops answering.
pub async fn browse<T, U>(pager: &mut Pager<T>, ui: &mut U, idle: Duration) -> DeskResult<()>
where
    T: Entity + Categorized,
    U: Ui + ?Sized,
{
    loop {
        let view = pager.view();
        let action = match tokio::time::timeout(idle, ui.page(&view)).await {
            Ok(action) => action?,
            Err(_) => return Ok(()),
        };
        match action {
            None | Some(PagerAction::Close) => return Ok(()),
            Some(action) => pager.apply(&action),
        }
    }
}
