//! One-off cache warm of the trip columns
//!
//! Reads each column on its own so the file pages it lives in end up in the
//! local page cache before interactive use.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::dataset::columns::TRIP_COLUMNS;
use crate::error::TaxiResult;
use crate::reader::{read_columns, ReadOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarmedColumn {
    pub column: String,
    pub rows: usize,
    pub elapsed_ms: u64,
}

pub fn warm_columns(path: &Path, options: &ReadOptions) -> TaxiResult<Vec<WarmedColumn>> {
    let mut warmed = Vec::with_capacity(TRIP_COLUMNS.len());
    for &column in TRIP_COLUMNS {
        info!(column, "making sure column is cached");
        let start = Instant::now();
        let mut rows = 0;
        for batch in read_columns(path, &[column], options)? {
            rows += batch?.num_rows();
        }
        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(column, rows, elapsed_ms, "column cached");
        warmed.push(WarmedColumn {
            column: column.to_string(),
            rows,
            elapsed_ms,
        });
    }
    Ok(warmed)
}
