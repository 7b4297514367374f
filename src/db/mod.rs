//! Database module for SQLite operations.
//!
//! This module provides:
//! - Connection pool setup and SQLite pragma configuration
//! - Schema creation and column reconciliation for the item table
//! - Repository layer for database operations

pub mod migrations;
pub mod repo;

pub use migrations::{ensure_schema, init_db};
pub use repo::Repository;
