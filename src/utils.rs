//! Column lookup and type normalisation helpers

use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::DataType;

use crate::error::{TaxiError, TaxiResult};

/// Index of a column by name, or `MissingColumn`
pub fn column_index(batch: &RecordBatch, name: &str) -> TaxiResult<usize> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name() == name)
        .ok_or_else(|| TaxiError::MissingColumn(name.to_string()))
}

/// Borrow a Float64 column by name
pub fn get_f64_column<'a>(batch: &'a RecordBatch, name: &str) -> TaxiResult<&'a Float64Array> {
    let col = batch.column(column_index(batch, name)?);
    col.as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| TaxiError::ColumnType {
            column: name.to_string(),
            found: col.data_type().to_string(),
        })
}

/// Borrow an Int32 column by name
pub fn get_i32_column<'a>(batch: &'a RecordBatch, name: &str) -> TaxiResult<&'a Int32Array> {
    let col = batch.column(column_index(batch, name)?);
    col.as_any()
        .downcast_ref::<Int32Array>()
        .ok_or_else(|| TaxiError::ColumnType {
            column: name.to_string(),
            found: col.data_type().to_string(),
        })
}

/// Cast a numeric column (Float32, Decimal128, ...) to `target` using the Arrow cast kernel.
/// Columns already of the target type are returned as-is.
pub fn cast_numeric(name: &str, col: &ArrayRef, target: &DataType) -> TaxiResult<ArrayRef> {
    if col.data_type() == target {
        return Ok(col.clone());
    }
    if !col.data_type().is_numeric() {
        return Err(TaxiError::ColumnType {
            column: name.to_string(),
            found: col.data_type().to_string(),
        });
    }
    Ok(cast(col, target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("fare", DataType::Float64, false),
            Field::new("hour", DataType::Int32, false),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Float64Array::from(vec![1.5, 2.5])),
                Arc::new(Int32Array::from(vec![3, 4])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_get_columns() {
        let batch = batch();
        assert_eq!(get_f64_column(&batch, "fare").unwrap().value(1), 2.5);
        assert_eq!(get_i32_column(&batch, "hour").unwrap().value(0), 3);
    }

    #[test]
    fn test_missing_and_mistyped_columns() {
        let batch = batch();
        assert!(matches!(
            get_f64_column(&batch, "tip"),
            Err(TaxiError::MissingColumn(_))
        ));
        assert!(matches!(
            get_f64_column(&batch, "hour"),
            Err(TaxiError::ColumnType { .. })
        ));
    }

    #[test]
    fn test_cast_numeric() {
        let col: ArrayRef = Arc::new(Float32Array::from(vec![0.5f32, 1.25]));
        let cast_col = cast_numeric("x", &col, &DataType::Float64).unwrap();
        let values = cast_col.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(values.value(1), 1.25);

        let strings: ArrayRef = Arc::new(StringArray::from(vec!["a"]));
        assert!(cast_numeric("s", &strings, &DataType::Float64).is_err());
    }
}
