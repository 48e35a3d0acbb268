//! Parallel driver for partitioning many dataset files.
//!
//! Partition jobs for different dataset files are independent: no
//! shared mutable state, no ordering dependency, and disjoint output
//! filenames (the source base name is part of every artifact name), so
//! the driver is a plain rayon parallel map with per-file results.
//! Within one file the partitioner stays synchronous and
//! single-threaded.

use std::path::{Path, PathBuf};

use log::warn;
use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::error::SplitResult;
use crate::partition::{PartitionReport, PartitionSpec, Partitioner, PartitionerConfig};

/// Outcome of one file's partition job.
#[derive(Debug)]
pub struct FileOutcome {
    /// The source dataset file.
    pub path: PathBuf,
    /// The job's report, or the error that stopped it.
    pub result: SplitResult<PartitionReport>,
}

/// Partition every file in `paths` with the same specifications.
///
/// Jobs run on the rayon thread pool; a failure in one file never
/// affects the others. Results are returned in the same order as
/// `paths`.
pub fn partition_files(
    paths: &[PathBuf],
    specs: &[PartitionSpec],
    config: &PartitionerConfig,
) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| FileOutcome {
            path: path.clone(),
            result: partition_file(path, specs, config),
        })
        .collect()
}

fn partition_file(
    path: &Path,
    specs: &[PartitionSpec],
    config: &PartitionerConfig,
) -> SplitResult<PartitionReport> {
    let dataset = Dataset::read_csv(path)?;
    let report = Partitioner::new(config.clone()).run(&dataset, specs)?;
    if !report.all_columns_ok() {
        warn!(
            "{} column(s) skipped for {} due to invalid interval sets",
            report.invalid_columns.len(),
            path.display()
        );
    }
    Ok(report)
}
