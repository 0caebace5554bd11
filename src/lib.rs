//! facetq - facet filter and relevance ranking query compiler.
//!
//! Turns product search request parameters into a scored boolean filter
//! expression for a hosted search index, expanding location and job-function
//! ids through their hierarchies on the way.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod search;
pub mod storage;
pub mod test_utils;

pub use error::{FacetError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
