//! Cross-module unit tests.

mod collection_tests;
mod config_tests;
mod hierarchy_tests;
mod storage_tests;
