//! Shared test utilities for facetq.
//!
//! Compiled into the library so integration tests and benches can build the
//! same hierarchies as the unit tests.

pub mod fixtures;
