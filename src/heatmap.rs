//! Pickup density grid over a viewport

use serde::Serialize;
use tracing::debug;

use crate::aggregator::Histogram2d;
use crate::binning::BinSpec;
use crate::dataset::{columns, TripDataset};
use crate::error::TaxiResult;
use crate::filter::build_hour_selection;
use crate::types::{BoundingBox, HourRange};
use crate::utils::get_f64_column;

/// `shape x shape` raw pickup counts aligned to `bbox`.
/// Cell `(x, y)` is longitude bin `x`, latitude bin `y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub bbox: BoundingBox,
    pub shape: usize,
    counts: Vec<u64>,
}

impl HeatmapGrid {
    pub fn get(&self, x: usize, y: usize) -> u64 {
        self.counts[x * self.shape + y]
    }

    /// Counts in x-major order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `ln(1 + count)` per cell, for display only
    pub fn log1p(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| (c as f64).ln_1p()).collect()
    }
}

/// Count pickups per 2D bin of `(pickup_longitude, pickup_latitude)` across
/// `bbox`, restricted to trips within `hours`.
pub fn compute_heatmap(
    dataset: &TripDataset,
    hours: Option<HourRange>,
    bbox: BoundingBox,
    shape: usize,
) -> TaxiResult<HeatmapGrid> {
    let selection = build_hour_selection(hours);
    let x_bins = BinSpec::new(bbox.longitude, shape)?;
    let y_bins = BinSpec::new(bbox.latitude, shape)?;
    let mut grid = Histogram2d::new(x_bins, y_bins);

    for batch in dataset.batches() {
        let mask = selection.mask(batch)?;
        if let Some(mask) = &mask {
            // Skip if everything filtered out
            if mask.true_count() == 0 {
                continue;
            }
        }

        let xs = get_f64_column(batch, columns::PICKUP_LONGITUDE)?;
        let ys = get_f64_column(batch, columns::PICKUP_LATITUDE)?;
        grid.aggregate_batch(mask.as_ref(), xs, ys);
    }

    let heatmap = HeatmapGrid {
        bbox,
        shape,
        counts: grid.into_counts(),
    };
    debug!(shape, total = heatmap.total(), "computed heatmap");
    Ok(heatmap)
}
