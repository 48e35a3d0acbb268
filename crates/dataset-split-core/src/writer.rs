//! Artifact writers for partitioned datasets.
//!
//! The partitioner depends only on the [`ArtifactWriter`] capability:
//! persist one dataset under a target name. The CSV implementation
//! writes with a write-then-rename sequence so a crash or error midway
//! never leaves a half-written artifact behind, and concurrent
//! multi-file runs (which write disjoint filenames) never observe
//! partial output.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use snafu::prelude::*;

use crate::dataset::Dataset;
use crate::error::{ArtifactIoSnafu, CsvWriteSnafu, SplitResult};

/// Serialization format for output artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Delimited text with a header row.
    #[default]
    Csv,
}

impl OutputFormat {
    /// File extension for artifacts in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
        }
    }
}

/// Capability to persist one dataset under a target name.
///
/// `name` is the artifact name without extension; the writer appends
/// its own extension and returns the full path it wrote.
pub trait ArtifactWriter {
    /// Persist `dataset` as `<name>.<ext>` and return the written path.
    fn write(&self, dataset: &Dataset, name: &str) -> SplitResult<PathBuf>;
}

/// Guard that removes a temporary file on drop unless disarmed.
/// Used to ensure cleanup on error paths during atomic writes.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Disarm the guard so the file is NOT removed on drop.
    /// Call this after a successful rename.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            // Best-effort cleanup; we're likely already handling another error.
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// CSV artifact writer rooted at one output directory.
///
/// Output bytes are a pure function of the dataset contents (no
/// timestamps, no randomized ordering), so re-partitioning the same
/// dataset with the same specification produces byte-identical
/// artifacts.
#[derive(Debug, Clone)]
pub struct CsvArtifactWriter {
    output_dir: PathBuf,
}

impl CsvArtifactWriter {
    /// Create a writer that places artifacts under `output_dir`,
    /// creating the directory on first write if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn encode(&self, dataset: &Dataset, target: &Path) -> SplitResult<Vec<u8>> {
        let mut buf = Vec::new();
        let mut writer = arrow_csv::WriterBuilder::new()
            .with_header(true)
            .build(&mut buf);
        writer
            .write(dataset.batch())
            .context(CsvWriteSnafu { path: target })?;
        drop(writer);
        Ok(buf)
    }
}

impl ArtifactWriter for CsvArtifactWriter {
    fn write(&self, dataset: &Dataset, name: &str) -> SplitResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).context(ArtifactIoSnafu {
            path: &self.output_dir,
        })?;

        let target = self
            .output_dir
            .join(format!("{name}.{}", OutputFormat::Csv.extension()));
        let contents = self.encode(dataset, &target)?;

        // Write-then-rename for atomic replacement.
        let tmp_path = target.with_extension("csv.tmp");
        let mut guard = TempFileGuard::new(tmp_path.clone());

        {
            let mut file = File::create(&tmp_path).context(ArtifactIoSnafu { path: &tmp_path })?;
            file.write_all(&contents)
                .context(ArtifactIoSnafu { path: &tmp_path })?;
            file.sync_all().context(ArtifactIoSnafu { path: &tmp_path })?;
        }

        fs::rename(&tmp_path, &target).context(ArtifactIoSnafu { path: &target })?;
        guard.disarm();

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, RecordBatch, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn small_dataset() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("store", DataType::Utf8, false),
            Field::new("variance", DataType::Float64, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float64Array::from(vec![0.5, 1.5])),
            ],
        )
        .unwrap();
        Dataset::from_batch(batch, "shop")
    }

    #[test]
    fn writes_csv_with_header_row() -> TestResult {
        let tmp = TempDir::new()?;
        let writer = CsvArtifactWriter::new(tmp.path());

        let path = writer.write(&small_dataset(), "shop_split_variance_0.0_2.0")?;
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "shop_split_variance_0.0_2.0.csv"
        );

        let contents = fs::read_to_string(&path)?;
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("store,variance"));
        assert_eq!(lines.next(), Some("a,0.5"));
        assert_eq!(lines.next(), Some("b,1.5"));
        Ok(())
    }

    #[test]
    fn creates_output_dir_and_leaves_no_tmp_file() -> TestResult {
        let tmp = TempDir::new()?;
        let out = tmp.path().join("splits/nested");
        let writer = CsvArtifactWriter::new(&out);

        writer.write(&small_dataset(), "shop_split_variance_0.0_2.0")?;

        assert!(out.join("shop_split_variance_0.0_2.0.csv").exists());
        assert!(!out.join("shop_split_variance_0.0_2.0.csv.tmp").exists());
        Ok(())
    }

    #[test]
    fn rewrites_are_byte_identical() -> TestResult {
        let tmp = TempDir::new()?;
        let writer = CsvArtifactWriter::new(tmp.path());
        let ds = small_dataset();

        let first = writer.write(&ds, "artifact")?;
        let bytes_first = fs::read(&first)?;
        let second = writer.write(&ds, "artifact")?;
        let bytes_second = fs::read(&second)?;

        assert_eq!(first, second);
        assert_eq!(bytes_first, bytes_second);
        Ok(())
    }
}
