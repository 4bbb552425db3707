//! Byte-level storage engines backing the SQL layer

pub mod engine;
pub mod memory;
