//! Unit test harness for els-sync.
//!
//! This module organizes unit tests for each component of the library.

mod config_parsing;
mod config_validation;
mod feed_table;
