//! Parquet reader with column projection and an optional row limit

use std::fs::File;
use std::path::Path;

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;

use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::{TaxiError, TaxiResult};

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub batch_size: usize,
    /// Read at most this many leading rows
    pub row_limit: Option<usize>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            row_limit: None,
        }
    }
}

/// Arrow schema of a Parquet file, without reading any row data
pub fn file_schema(path: &Path) -> TaxiResult<SchemaRef> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    Ok(builder.schema().clone())
}

/// Read only the named columns of a Parquet file.
/// Returns an iterator over record batches whose columns follow file order.
pub fn read_columns(
    path: &Path,
    columns: &[&str],
    options: &ReadOptions,
) -> TaxiResult<TripReader> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let parquet_schema = builder.parquet_schema();
    let arrow_schema = builder.schema();

    // Find indices of required columns
    let projection_indices = columns
        .iter()
        .map(|name| {
            arrow_schema
                .fields()
                .iter()
                .position(|f| f.name() == *name)
                .ok_or_else(|| TaxiError::MissingColumn(name.to_string()))
        })
        .collect::<TaxiResult<Vec<usize>>>()?;

    let projection = ProjectionMask::roots(parquet_schema, projection_indices);

    let mut builder = builder
        .with_projection(projection)
        .with_batch_size(options.batch_size);
    if let Some(limit) = options.row_limit {
        builder = builder.with_limit(limit);
    }

    Ok(TripReader {
        inner: builder.build()?,
    })
}

pub struct TripReader {
    inner: ParquetRecordBatchReader,
}

impl Iterator for TripReader {
    type Item = Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
