//! SQL processing module
//!
//! This module provides:
//! - `parser`: statement dispatcher and clause parsers
//! - `types`: values and column types
//! - `schema`: table and column schema definitions
//! - `executor`: query and mutation execution
//! - `engine`: the table store and sessions

pub mod engine;
pub mod executor;
pub mod parser;
pub mod schema;
pub mod types;
