//! In-memory, read-only trip dataset
//!
//! Loaded once at startup from Parquet and shared between queries. Columns are
//! normalised on load so the query path only ever sees `Float64` coordinates
//! and fares and an `Int32` pickup hour.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::ArrayRef;
use arrow::compute::kernels::temporal::{date_part, DatePart};
use arrow_array::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use tracing::{debug, info};

use crate::error::{TaxiError, TaxiResult};
use crate::reader::{file_schema, read_columns, ReadOptions};
use crate::utils::{cast_numeric, column_index};

/// Trip column names
pub mod columns {
    pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
    pub const PICKUP_LATITUDE: &str = "pickup_latitude";
    pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
    pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
    pub const PICKUP_HOUR: &str = "pickup_hour";
    pub const TOTAL_AMOUNT: &str = "total_amount";
    /// Fallback source for `pickup_hour`
    pub const PICKUP_DATETIME: &str = "pickup_datetime";

    pub const FLOAT_COLUMNS: &[&str] = &[
        PICKUP_LONGITUDE,
        PICKUP_LATITUDE,
        DROPOFF_LONGITUDE,
        DROPOFF_LATITUDE,
        TOTAL_AMOUNT,
    ];

    /// Every column a query reads
    pub const TRIP_COLUMNS: &[&str] = &[
        PICKUP_LONGITUDE,
        PICKUP_LATITUDE,
        DROPOFF_LONGITUDE,
        DROPOFF_LATITUDE,
        TOTAL_AMOUNT,
        PICKUP_HOUR,
    ];
}

/// Schema of normalised trip batches
pub fn trip_schema() -> SchemaRef {
    let mut fields: Vec<Field> = columns::FLOAT_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, true))
        .collect();
    fields.push(Field::new(columns::PICKUP_HOUR, DataType::Int32, true));
    Arc::new(Schema::new(fields))
}

/// Rewrite a batch into [`trip_schema`] order and types.
/// The hour is derived from `pickup_datetime` when `pickup_hour` is absent.
fn normalize_batch(batch: &RecordBatch, schema: &SchemaRef) -> TaxiResult<RecordBatch> {
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns::TRIP_COLUMNS.len());
    for name in columns::FLOAT_COLUMNS {
        let col = batch.column(column_index(batch, name)?);
        arrays.push(cast_numeric(name, col, &DataType::Float64)?);
    }

    let hour = match column_index(batch, columns::PICKUP_HOUR) {
        Ok(idx) => cast_numeric(columns::PICKUP_HOUR, batch.column(idx), &DataType::Int32)?,
        Err(_) => {
            let idx = column_index(batch, columns::PICKUP_DATETIME)
                .map_err(|_| TaxiError::MissingColumn(columns::PICKUP_HOUR.to_string()))?;
            date_part(batch.column(idx).as_ref(), DatePart::Hour)?
        }
    };
    arrays.push(hour);

    Ok(RecordBatch::try_new(schema.clone(), arrays)?)
}

/// Read-only trip batches, shared by reference between queries
#[derive(Debug, Clone)]
pub struct TripDataset {
    batches: Vec<RecordBatch>,
    num_rows: usize,
}

impl TripDataset {
    /// Load the trip columns of a Parquet file into memory
    pub fn open(path: impl AsRef<Path>, options: &ReadOptions) -> TaxiResult<Self> {
        let path = path.as_ref();
        let start = Instant::now();

        let available = file_schema(path)?;
        let has_column = |name: &str| available.fields().iter().any(|f| f.name() == name);

        let mut wanted: Vec<&str> = columns::FLOAT_COLUMNS.to_vec();
        if has_column(columns::PICKUP_HOUR) {
            wanted.push(columns::PICKUP_HOUR);
        } else if has_column(columns::PICKUP_DATETIME) {
            debug!("deriving pickup_hour from pickup_datetime");
            wanted.push(columns::PICKUP_DATETIME);
        } else {
            return Err(TaxiError::MissingColumn(columns::PICKUP_HOUR.to_string()));
        }

        let batches = read_columns(path, &wanted, options)?
            .map(|batch| batch.map_err(TaxiError::from))
            .collect::<TaxiResult<Vec<_>>>()?;
        let dataset = Self::from_batches(batches)?;

        info!(
            path = %path.display(),
            rows = dataset.num_rows(),
            batches = dataset.batches.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded trip dataset"
        );
        Ok(dataset)
    }

    /// Build from batches already in memory; each is normalised to [`trip_schema`]
    pub fn from_batches(batches: Vec<RecordBatch>) -> TaxiResult<Self> {
        let schema = trip_schema();
        let batches = batches
            .iter()
            .filter(|b| b.num_rows() > 0)
            .map(|b| normalize_batch(b, &schema))
            .collect::<TaxiResult<Vec<_>>>()?;
        let num_rows = batches.iter().map(|b| b.num_rows()).sum();
        Ok(Self { batches, num_rows })
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }
}
