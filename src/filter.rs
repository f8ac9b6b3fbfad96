//! Row selections evaluated with Arrow comparison kernels
//!
//! A [`Selection`] is an AND of zero or more [`Condition`]s. It is built per
//! query and evaluated batch by batch, so the shared dataset is never touched.

use arrow::array::{BooleanArray, Float64Array, Int32Array, RecordBatch, Scalar};
use arrow::compute;
use tracing::debug;

use crate::dataset::columns;
use crate::error::TaxiResult;
use crate::expressions::squared_distance;
use crate::types::{HourRange, Point, MAX_HOUR, MIN_HOUR};
use crate::utils::{get_f64_column, get_i32_column};

/// One clause of a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `pickup_hour >= hour`
    HourAtLeast(u8),
    /// `pickup_hour <= hour`
    HourAtMost(u8),
    /// `(lon - center.lon)² + (lat - center.lat)² <= radius²`
    WithinRadius {
        longitude: &'static str,
        latitude: &'static str,
        center: Point,
        radius: f64,
    },
}

impl Condition {
    fn mask(&self, batch: &RecordBatch) -> TaxiResult<BooleanArray> {
        match self {
            Condition::HourAtLeast(hour) => {
                let hours = get_i32_column(batch, columns::PICKUP_HOUR)?;
                let scalar = Scalar::new(Int32Array::from(vec![*hour as i32]));
                Ok(compute::kernels::cmp::gt_eq(hours, &scalar)?)
            }
            Condition::HourAtMost(hour) => {
                let hours = get_i32_column(batch, columns::PICKUP_HOUR)?;
                let scalar = Scalar::new(Int32Array::from(vec![*hour as i32]));
                Ok(compute::kernels::cmp::lt_eq(hours, &scalar)?)
            }
            Condition::WithinRadius {
                longitude,
                latitude,
                center,
                radius,
            } => {
                let xs = get_f64_column(batch, longitude)?;
                let ys = get_f64_column(batch, latitude)?;
                let distance = squared_distance(xs, ys, *center)?;
                let limit = Scalar::new(Float64Array::from(vec![radius * radius]));
                Ok(compute::kernels::cmp::lt_eq(&distance, &limit)?)
            }
        }
    }
}

/// AND of conditions. The empty selection selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    conditions: Vec<Condition>,
}

impl Selection {
    /// The identity selection.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn is_all(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluate against one batch. `None` means every row is selected and
    /// no filtering work was done. Rows where any input is null are not selected.
    pub fn mask(&self, batch: &RecordBatch) -> TaxiResult<Option<BooleanArray>> {
        let mut combined: Option<BooleanArray> = None;
        for condition in &self.conditions {
            let mask = condition.mask(batch)?;
            combined = Some(match combined {
                Some(acc) => compute::and(&acc, &mask)?,
                None => mask,
            });
        }
        // Null comparison results count as unselected
        Ok(combined.map(|mask| compute::prep_null_mask_filter(&mask)))
    }
}

/// Selection for an optional pickup-hour range.
///
/// Bounds at the ends of the day are skipped, so `[0, 23]` (the slider's
/// resting state) is the same as no selection and costs nothing to evaluate.
pub fn build_hour_selection(hours: Option<HourRange>) -> Selection {
    let mut selection = Selection::all();
    if let Some(range) = hours {
        if range.min() > MIN_HOUR {
            selection = selection.and(Condition::HourAtLeast(range.min()));
        }
        if range.max() < MAX_HOUR {
            selection = selection.and(Condition::HourAtMost(range.max()));
        }
    }
    debug!(conditions = selection.conditions.len(), "built hour selection");
    selection
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Array, ArrayRef};

    use super::*;
    use crate::dataset::test_support::trips_batch;
    use crate::dataset::trip_schema;

    #[test]
    fn test_no_hours_selects_all() {
        assert!(build_hour_selection(None).is_all());
    }

    #[test]
    fn test_full_day_selects_all() {
        assert!(build_hour_selection(Some(HourRange::full_day())).is_all());
    }

    #[test]
    fn test_one_sided_ranges() {
        let selection = build_hour_selection(Some(HourRange::new(0, 15).unwrap()));
        assert_eq!(selection.conditions(), &[Condition::HourAtMost(15)]);

        let selection = build_hour_selection(Some(HourRange::new(12, 23).unwrap()));
        assert_eq!(selection.conditions(), &[Condition::HourAtLeast(12)]);
    }

    #[test]
    fn test_hour_mask() {
        let batch = trips_batch(&[
            (0, (0.0, 0.0), (0.0, 0.0), 5.0),
            (12, (0.0, 0.0), (0.0, 0.0), 5.0),
            (15, (0.0, 0.0), (0.0, 0.0), 5.0),
            (16, (0.0, 0.0), (0.0, 0.0), 5.0),
        ]);
        let selection = build_hour_selection(Some(HourRange::new(12, 15).unwrap()));
        let mask = selection.mask(&batch).unwrap().unwrap();
        assert_eq!(mask, BooleanArray::from(vec![false, true, true, false]));
        assert!(Selection::all().mask(&batch).unwrap().is_none());
    }

    #[test]
    fn test_radius_mask() {
        let batch = trips_batch(&[
            (1, (1.0, 1.0), (0.0, 0.0), 5.0),
            (1, (1.3, 1.3), (0.0, 0.0), 5.0),
            (1, (1.0, 1.6), (0.0, 0.0), 5.0),
        ]);
        let selection = Selection::all().and(Condition::WithinRadius {
            longitude: columns::PICKUP_LONGITUDE,
            latitude: columns::PICKUP_LATITUDE,
            center: Point::new(1.0, 1.0).unwrap(),
            radius: 0.5,
        });
        let mask = selection.mask(&batch).unwrap().unwrap();
        assert_eq!(mask, BooleanArray::from(vec![true, true, false]));
    }

    #[test]
    fn test_nulls_never_match() {
        let floats =
            |values: Vec<Option<f64>>| -> ArrayRef { Arc::new(Float64Array::from(values)) };
        let batch = RecordBatch::try_new(
            trip_schema(),
            vec![
                floats(vec![Some(1.0), None, Some(1.0)]),
                floats(vec![Some(1.0), Some(1.0), Some(1.0)]),
                floats(vec![Some(0.0); 3]),
                floats(vec![Some(0.0); 3]),
                floats(vec![Some(5.0); 3]),
                Arc::new(Int32Array::from(vec![None, Some(13), Some(13)])),
            ],
        )
        .unwrap();

        let selection = build_hour_selection(Some(HourRange::new(12, 15).unwrap())).and(
            Condition::WithinRadius {
                longitude: columns::PICKUP_LONGITUDE,
                latitude: columns::PICKUP_LATITUDE,
                center: Point::new(1.0, 1.0).unwrap(),
                radius: 0.5,
            },
        );
        let mask = selection.mask(&batch).unwrap().unwrap();
        assert_eq!(mask, BooleanArray::from(vec![false, false, true]));
        assert_eq!(mask.null_count(), 0);
    }
}
