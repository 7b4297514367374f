//! The to-do item entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Status assigned to every item on creation.
pub const DEFAULT_STATUS: &str = "Doing";

/// A persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    /// Storage-assigned identifier. Never reassigned.
    pub id: i64,
    pub title: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("Title cannot be empty")]
    Empty,
}

/// A validated item that has not been stored yet.
///
/// The title is trimmed and guaranteed non-empty; the status is always
/// [`DEFAULT_STATUS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    title: String,
    status: &'static str,
}

impl NewItem {
    pub fn new(title: &str) -> Result<Self, TitleError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TitleError::Empty);
        }
        Ok(Self {
            title: title.to_string(),
            status: DEFAULT_STATUS,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> &str {
        self.status
    }
}
