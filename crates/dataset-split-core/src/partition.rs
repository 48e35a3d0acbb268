//! Partition execution: specifications, the partitioner, and reports.
//!
//! A [`PartitionSpec`] names one numeric column and its ordered
//! interval set; it is plain configuration data (serde-deserializable)
//! so each data source ships a spec file, not code. The
//! [`Partitioner`] executes one or more specs against a [`Dataset`]:
//!
//! 1. Validate each column's interval set. An invalid set is logged,
//!    recorded in the report, and skipped; other columns still run
//!    (per-column isolation rather than whole-run abort).
//! 2. Bucket rows per interval via boolean masks built from
//!    [`Interval::contains`].
//! 3. Enforce row-count conservation: subset sizes must sum to the
//!    dataset's total row count. A violation aborts the run with an
//!    error; it signals a gapped/overlapping interval set or values
//!    (nulls, NaN) outside every interval, i.e. silently lost or
//!    duplicated rows.
//! 4. Write one artifact per (column, interval) pair under the
//!    deterministic name
//!    `<sourceName>_split_<column>_<lowerLiteral>_<upperLiteral>`.

use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::BooleanArray;
use log::{error, info};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::dataset::Dataset;
use crate::error::{
    InvalidIntervalSetSnafu, RowCountConservationSnafu, SpecIoSnafu, SpecParseSnafu, SplitResult,
};
use crate::interval::validate::{Violation, violations};
use crate::interval::Interval;
use crate::writer::{ArtifactWriter, CsvArtifactWriter, OutputFormat};

/// The full interval set defined over one column.
///
/// The intervals are intended to be exhaustive and disjoint over the
/// column's observed domain; that intent is enforced lazily by the
/// row-count-conservation check, not by interval algebra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionSpec {
    /// Column name, used verbatim as the partition key.
    pub column: String,
    /// Ordered interval set for the column.
    pub intervals: Vec<Interval>,
}

impl PartitionSpec {
    /// Construct a specification for `column` from an interval list.
    pub fn new(column: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            column: column.into(),
            intervals,
        }
    }

    /// Load a list of specifications from a JSON file.
    ///
    /// The file holds an array of `{ "column": ..., "intervals": [...] }`
    /// objects with bounds encoded as numbers or `"-inf"` / `"inf"`.
    pub fn load_specs(path: impl AsRef<Path>) -> SplitResult<Vec<PartitionSpec>> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).context(SpecIoSnafu { path })?;
        serde_json::from_str(&contents).context(SpecParseSnafu { path })
    }

    /// Validate this specification's interval set.
    ///
    /// Fail-fast alternative to the partitioner's per-column isolation:
    /// callers that prefer aborting a whole run on a bad specification
    /// can check every spec up front and get the typed error.
    pub fn check(&self) -> SplitResult<()> {
        let found = violations(&self.intervals);
        ensure!(
            found.is_empty(),
            InvalidIntervalSetSnafu {
                column: self.column.clone(),
                violations: found,
            }
        );
        Ok(())
    }
}

/// Explicit configuration for a partition run.
///
/// Passed in at construction time; there is no hidden process-wide
/// state (no global paths, no shared logger singletons).
#[derive(Debug, Clone)]
pub struct PartitionerConfig {
    /// Directory artifacts are written into.
    pub output_dir: PathBuf,
    /// Serialization format for artifacts.
    pub format: OutputFormat,
}

impl PartitionerConfig {
    /// Configuration writing CSV artifacts under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::Csv,
        }
    }
}

/// One artifact written during a partition run.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    /// Column the artifact was partitioned on.
    pub column: String,
    /// The interval whose rows the artifact holds.
    pub interval: Interval,
    /// Number of rows in the artifact.
    pub rows: usize,
    /// Path the artifact was written to.
    pub path: PathBuf,
}

/// A column skipped because its interval set failed validation.
#[derive(Debug, Clone)]
pub struct InvalidColumn {
    /// The skipped column.
    pub column: String,
    /// Every violation found in its interval set.
    pub violations: Vec<Violation>,
}

/// Outcome of a partition run: artifacts written and columns skipped.
#[derive(Debug, Clone, Default)]
pub struct PartitionReport {
    /// One record per artifact written, in (column, interval) order.
    pub artifacts: Vec<ArtifactRecord>,
    /// Columns whose interval sets were rejected and skipped.
    pub invalid_columns: Vec<InvalidColumn>,
}

impl PartitionReport {
    /// True iff every column partitioned cleanly.
    pub fn all_columns_ok(&self) -> bool {
        self.invalid_columns.is_empty()
    }
}

/// Executes partition specifications against datasets.
pub struct Partitioner {
    config: PartitionerConfig,
}

impl Partitioner {
    /// Create a partitioner with an explicit configuration.
    pub fn new(config: PartitionerConfig) -> Self {
        Self { config }
    }

    /// Deterministic artifact name for one (source, column, interval)
    /// triple, without extension.
    ///
    /// Bound text is the literal bound value (including `-inf` / `inf`
    /// for symbolic infinities) so operators can map output files back
    /// to the partition definition without consulting code.
    pub fn artifact_name(source_name: &str, column: &str, interval: &Interval) -> String {
        format!(
            "{source_name}_split_{column}_{}_{}",
            interval.lower.literal(),
            interval.upper.literal()
        )
    }

    /// Execute every specification in `specs` against `dataset`.
    ///
    /// Columns with invalid interval sets are logged, recorded in the
    /// report, and skipped; remaining columns still run. A row-count
    /// conservation violation aborts the run with an error and is never
    /// swallowed. A failed run has no partial-resume semantics: fix the
    /// specification or the input and re-run from scratch.
    pub fn run(&self, dataset: &Dataset, specs: &[PartitionSpec]) -> SplitResult<PartitionReport> {
        let writer = match self.config.format {
            OutputFormat::Csv => CsvArtifactWriter::new(&self.config.output_dir),
        };

        let mut report = PartitionReport::default();

        for spec in specs {
            let found = violations(&spec.intervals);
            if !found.is_empty() {
                let joined = found
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                error!(
                    "skipping column {:?} of {:?}: invalid interval set ({joined})",
                    spec.column,
                    dataset.source_name()
                );
                report.invalid_columns.push(InvalidColumn {
                    column: spec.column.clone(),
                    violations: found,
                });
                continue;
            }

            self.partition_column(dataset, spec, &writer, &mut report)?;
        }

        Ok(report)
    }

    fn partition_column(
        &self,
        dataset: &Dataset,
        spec: &PartitionSpec,
        writer: &dyn ArtifactWriter,
        report: &mut PartitionReport,
    ) -> SplitResult<()> {
        let values = dataset.numeric_column(&spec.column)?;

        // One subset per interval; each row is tested against every
        // interval's predicate independently, exactly mirroring
        // Interval::contains.
        let mut subsets = Vec::with_capacity(spec.intervals.len());
        let mut bucketed_rows = 0usize;
        for interval in &spec.intervals {
            let mask: BooleanArray = values
                .iter()
                .map(|v| Some(v.is_some_and(|x| interval.contains(x))))
                .collect();
            let subset = dataset.filter(&mask)?;
            bucketed_rows += subset.num_rows();
            subsets.push(subset);
        }

        // Conservation before any write: a gapped or overlapping set
        // must not leave a partial artifact batch behind.
        ensure!(
            bucketed_rows == dataset.num_rows(),
            RowCountConservationSnafu {
                column: spec.column.clone(),
                expected: dataset.num_rows(),
                actual: bucketed_rows,
            }
        );

        for (interval, subset) in spec.intervals.iter().zip(&subsets) {
            let name = Self::artifact_name(dataset.source_name(), &spec.column, interval);
            let path = writer.write(subset, &name)?;
            info!(
                "wrote {} rows of {:?} for {} to {}",
                subset.num_rows(),
                spec.column,
                interval,
                path.display()
            );
            report.artifacts.push(ArtifactRecord {
                column: spec.column.clone(),
                interval: *interval,
                rows: subset.num_rows(),
                path,
            });
        }

        Ok(())
    }
}
