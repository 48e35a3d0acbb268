//! In-memory tabular dataset backed by an Arrow `RecordBatch`.
//!
//! A [`Dataset`] is read once from a delimited text file (header row,
//! schema inferred) and never mutated in place: every partition
//! operation produces new row-subset copies via boolean-mask filtering,
//! leaving the source batch untouched. The reader concatenates all CSV
//! batches up front so partitioning is a single bounded pass over one
//! batch.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{BooleanArray, Float64Array, RecordBatch};
use arrow::compute::{cast, concat_batches, filter_record_batch};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::error::ArrowError;
use arrow_csv::ReaderBuilder;
use arrow_csv::reader::Format;
use snafu::prelude::*;

use crate::error::{
    CsvReadSnafu, DatasetIoSnafu, FilterSnafu, MissingColumnSnafu, SplitError, SplitResult,
};

/// A fully materialized tabular dataset plus the source base name it
/// was read from.
///
/// The source name feeds the artifact naming convention
/// (`<sourceName>_split_<column>_<lower>_<upper>`), so it is carried
/// alongside the data rather than re-derived by callers.
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
    source_name: String,
}

impl Dataset {
    /// Read a delimited text file with a header row into memory.
    ///
    /// The schema is inferred from the file contents; all reader
    /// batches are concatenated into a single batch. The source name is
    /// the file stem (`store_reviews.csv` -> `store_reviews`).
    pub fn read_csv(path: impl AsRef<Path>) -> SplitResult<Self> {
        let path = path.as_ref();
        let source_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut file = File::open(path).context(DatasetIoSnafu { path })?;

        let format = Format::default().with_header(true);
        let (schema, _) = format
            .infer_schema(&mut file, None)
            .context(CsvReadSnafu { path })?;
        file.rewind().context(DatasetIoSnafu { path })?;

        let schema: SchemaRef = Arc::new(schema);
        let reader = ReaderBuilder::new(schema.clone())
            .with_format(format)
            .build(file)
            .context(CsvReadSnafu { path })?;

        let batches = reader
            .collect::<Result<Vec<_>, ArrowError>>()
            .context(CsvReadSnafu { path })?;
        let batch = concat_batches(&schema, &batches).context(CsvReadSnafu { path })?;

        Ok(Self { batch, source_name })
    }

    /// Wrap an already materialized batch as a dataset.
    pub fn from_batch(batch: RecordBatch, source_name: impl Into<String>) -> Self {
        Self {
            batch,
            source_name: source_name.into(),
        }
    }

    /// Total number of rows.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Base name of the source artifact this dataset was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The dataset's schema.
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Borrow the underlying batch.
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Return `column` cast to `Float64` for interval membership tests.
    ///
    /// Nulls survive the cast and are treated by callers as matching no
    /// interval. A missing column or a column that cannot be cast to a
    /// float type is an error.
    pub fn numeric_column(&self, column: &str) -> SplitResult<Float64Array> {
        let col = self
            .batch
            .column_by_name(column)
            .context(MissingColumnSnafu {
                column,
                source_name: self.source_name.as_str(),
            })?;

        let datatype = col.data_type().clone();
        let casted =
            cast(col, &DataType::Float64).map_err(|source| SplitError::ColumnNotNumeric {
                column: column.to_string(),
                datatype: datatype.clone(),
                source,
            })?;

        casted
            .as_any()
            .downcast_ref::<Float64Array>()
            .cloned()
            .ok_or_else(|| SplitError::ColumnNotNumeric {
                column: column.to_string(),
                datatype,
                source: ArrowError::CastError(
                    "cast to Float64 produced an unexpected array type".to_string(),
                ),
            })
    }

    /// Produce a row-subset copy of this dataset.
    ///
    /// Rows where `mask` is true are kept, preserving their relative
    /// order; the source batch is untouched. Null mask slots drop the
    /// row, matching `filter_record_batch` semantics.
    pub fn filter(&self, mask: &BooleanArray) -> SplitResult<Dataset> {
        let batch = filter_record_batch(&self.batch, mask).context(FilterSnafu)?;
        Ok(Dataset {
            batch,
            source_name: self.source_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BinaryArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::io::Write;
    use tempfile::TempDir;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    pub(crate) fn variance_batch(values: &[Option<f64>]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("store", DataType::Utf8, false),
            Field::new("variance", DataType::Float64, true),
        ]);
        let stores: Vec<String> = (0..values.len()).map(|i| format!("store_{i}")).collect();
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(stores)),
                Arc::new(Float64Array::from(values.to_vec())),
            ],
        )
        .expect("valid test batch")
    }

    #[test]
    fn read_csv_materializes_rows_and_source_name() -> TestResult {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("store_reviews.csv");
        let mut f = File::create(&path)?;
        writeln!(f, "store,variance")?;
        writeln!(f, "a,0.0")?;
        writeln!(f, "b,1.5")?;
        writeln!(f, "c,5.0")?;

        let ds = Dataset::read_csv(&path)?;
        assert_eq!(ds.num_rows(), 3);
        assert_eq!(ds.source_name(), "store_reviews");

        let col = ds.numeric_column("variance")?;
        assert_eq!(col.value(1), 1.5);
        Ok(())
    }

    #[test]
    fn read_csv_missing_file_is_dataset_io() {
        let err = Dataset::read_csv("/nonexistent/does_not_exist.csv")
            .expect_err("expected DatasetIo error");
        assert!(matches!(err, SplitError::DatasetIo { .. }));
    }

    #[test]
    fn numeric_column_casts_integers() {
        let schema = Schema::new(vec![Field::new("score", DataType::Int64, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(Int64Array::from(vec![1, 9, 10]))],
        )
        .unwrap();

        let ds = Dataset::from_batch(batch, "scores");
        let col = ds.numeric_column("score").unwrap();
        assert_eq!(col.value(2), 10.0);
    }

    #[test]
    fn numeric_column_missing_is_an_error() {
        let ds = Dataset::from_batch(variance_batch(&[Some(1.0)]), "reviews");
        let err = ds
            .numeric_column("kurtosis")
            .expect_err("expected MissingColumn error");
        assert!(matches!(err, SplitError::MissingColumn { .. }));
    }

    #[test]
    fn numeric_column_rejects_uncastable_types() {
        let schema = Schema::new(vec![Field::new("blob", DataType::Binary, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(BinaryArray::from(vec![&b"ab"[..], &b"cd"[..]]))],
        )
        .unwrap();

        let ds = Dataset::from_batch(batch, "blobs");
        let err = ds
            .numeric_column("blob")
            .expect_err("expected ColumnNotNumeric error");
        assert!(matches!(err, SplitError::ColumnNotNumeric { .. }));
    }

    #[test]
    fn filter_keeps_masked_rows_and_source_name() -> TestResult {
        let ds = Dataset::from_batch(variance_batch(&[Some(0.0), Some(1.0), Some(2.0)]), "shop");
        let mask = BooleanArray::from(vec![true, false, true]);

        let subset = ds.filter(&mask)?;
        assert_eq!(subset.num_rows(), 2);
        assert_eq!(subset.source_name(), "shop");

        // Source untouched.
        assert_eq!(ds.num_rows(), 3);
        Ok(())
    }
}
