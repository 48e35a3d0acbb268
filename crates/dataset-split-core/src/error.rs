//! Error types and SNAFU context selectors for the partitioner.
//!
//! This module centralizes the `SplitError` enum used by the public API
//! and exposes context selectors (via `#[snafu(visibility(pub(crate)))]`)
//! so sibling modules can attach error context without re-exporting
//! everything at the crate root. Keep new variants here to ensure
//! consistent user-facing messages.

use std::io;
use std::path::PathBuf;

use arrow::{datatypes::DataType, error::ArrowError};
use snafu::prelude::*;

use crate::interval::validate::Violation;

/// General result type used by partitioning operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Errors from dataset loading, validation, partitioning, and artifact
/// writing.
///
/// Each variant quotes enough context (column name, row counts, paths)
/// for a human to correct the partition specification or the input
/// dataset without reading code.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SplitError {
    /// Could not open or read the source dataset file.
    #[snafu(display("Cannot read dataset at {}: {source}", path.display()))]
    DatasetIo {
        /// Path of the dataset that could not be read.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// CSV decoding or schema inference failed for the source dataset.
    #[snafu(display("Cannot decode CSV dataset at {}: {source}", path.display()))]
    CsvRead {
        /// Path of the dataset that could not be decoded.
        path: PathBuf,
        /// Underlying Arrow CSV error.
        source: ArrowError,
    },

    /// The partition column does not exist in the dataset.
    #[snafu(display("Column {column:?} not found in dataset {source_name:?}"))]
    MissingColumn {
        /// The requested partition column.
        column: String,
        /// Source name of the dataset that was searched.
        source_name: String,
    },

    /// The partition column exists but cannot be treated as numeric.
    #[snafu(display("Column {column:?} has non-numeric type {datatype:?}: {source}"))]
    ColumnNotNumeric {
        /// The offending column.
        column: String,
        /// The Arrow type found in the dataset.
        datatype: DataType,
        /// Underlying Arrow cast error.
        source: ArrowError,
    },

    /// Arrow compute error while filtering or concatenating batches.
    #[snafu(display("Arrow error while filtering rows: {source}"))]
    Filter {
        /// Underlying Arrow error.
        source: ArrowError,
    },

    /// The interval set for a column failed well-formedness validation.
    #[snafu(display(
        "Invalid interval set for column {column:?}: {}",
        join_violations(violations)
    ))]
    InvalidIntervalSet {
        /// The column whose interval set was rejected.
        column: String,
        /// Every violation found in the set.
        violations: Vec<Violation>,
    },

    /// Subset sizes did not sum to the dataset's total row count.
    ///
    /// This is the safety net for gapped/overlapping interval sets and
    /// for values (nulls, NaN) that fall outside every interval. It is
    /// always propagated, never swallowed.
    #[snafu(display(
        "Row-count conservation violated for column {column:?}: \
         subsets hold {actual} rows, dataset has {expected}"
    ))]
    RowCountConservation {
        /// The column whose partition lost or duplicated rows.
        column: String,
        /// Total row count of the source dataset.
        expected: usize,
        /// Sum of the per-interval subset sizes.
        actual: usize,
    },

    /// CSV encoding failed while writing an artifact.
    #[snafu(display("Cannot encode CSV artifact {}: {source}", path.display()))]
    CsvWrite {
        /// Target path of the artifact.
        path: PathBuf,
        /// Underlying Arrow CSV error.
        source: ArrowError,
    },

    /// Filesystem error while writing an artifact.
    #[snafu(display("Cannot write artifact at {}: {source}", path.display()))]
    ArtifactIo {
        /// Path being written when the error occurred.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// A partition-specification file could not be read.
    #[snafu(display("Cannot read spec file at {}: {source}", path.display()))]
    SpecIo {
        /// Path of the specification file.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// A partition-specification file could not be parsed.
    #[snafu(display("Cannot parse spec file at {}: {source}", path.display()))]
    SpecParse {
        /// Path of the specification file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
