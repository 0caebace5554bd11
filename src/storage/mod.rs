//! Storage layer for facetq
//!
//! Hierarchies are persisted in SQLite and loaded into memory at startup.

pub mod migrations;
pub mod sqlite;

pub use sqlite::{Database, HierarchyCounts, ImportRecord};
