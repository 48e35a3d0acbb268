//! Interval-based partitioning of tabular datasets.
//!
//! This crate provides the pieces needed to split one tabular dataset
//! into several derived datasets by numeric ranges:
//!
//! - A boundary-typed `Interval` type with symbolic infinite bounds and
//!   a batch validator for interval sets (`interval` module).
//! - A `Dataset` abstraction over an Arrow `RecordBatch` with CSV
//!   ingestion and boolean-mask row filtering (`dataset` module).
//! - A `Partitioner` that executes per-column partition specifications,
//!   enforces row-count conservation, and emits one artifact per
//!   (column, interval) pair (`partition` module).
//! - A CSV artifact writer with atomic write-then-rename semantics
//!   (`writer` module).
//! - A parallel driver for running independent partition jobs over
//!   many dataset files (`runner` module).
//!
//! Orchestration code (schedulers, upstream feature computation, label
//! derivation) is expected to depend on this crate rather than carrying
//! its own copy of the splitting logic.
#![deny(missing_docs)]
pub mod dataset;
pub mod error;
pub mod interval;
pub mod partition;
pub mod runner;
pub mod writer;
