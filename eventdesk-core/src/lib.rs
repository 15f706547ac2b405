//! Core of eventdesk.
//!
//! - `store`: load/save of the two JSON collections
//! - `event` / `item`: the record types and their editable fields
//! - `flow`: guided create/edit/delete flows driven through a [`ui::Ui`]
//! - `sweeper`: background removal of expired events
//! - `listing` / `access`: paged views and role-based visibility

pub mod access;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod event;
pub mod flow;
pub mod item;
pub mod listing;
pub mod store;
pub mod sweeper;
pub mod timezone;
pub mod ui;
pub mod validate;

pub use error::{DeskError, DeskResult, ValidationError};
