//! Domain types for the to-do item service.
//!
//! This module provides:
//! - The `TodoItem` entity and the validated `NewItem` used for inserts
//! - Offset-based `Paging` with default normalization

pub mod item;
pub mod paging;

pub use item::{NewItem, TitleError, TodoItem, DEFAULT_STATUS};
pub use paging::Paging;
