//! MiniDB - a minimal in-memory relational store
//!
//! This crate provides:
//! - A statement dispatcher and clause parsers for a restricted SQL dialect
//! - Typed values and schema enforcement
//! - Executors for DDL, DML, projections, DISTINCT, aggregates and equi-joins
//! - A byte-level in-memory storage engine
//! - A line-oriented prompt and script runner

pub mod error;
pub mod repl;
pub mod sql;
pub mod storage;
