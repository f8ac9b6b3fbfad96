//! Query orchestration - ties together all components

use std::sync::Arc;

use tracing::{info_span, warn};

use crate::aggregator::Counter;
use crate::binning::BinSpec;
use crate::config::Config;
use crate::dataset::TripDataset;
use crate::error::TaxiResult;
use crate::filter::build_hour_selection;
use crate::heatmap::{compute_heatmap, HeatmapGrid};
use crate::peak::{find_peak, Peak};
use crate::trips::{compute_trip_details, TripDetails};
use crate::types::{BoundingBox, HourRange, Point};

/// Answers dashboard queries over a shared, read-only dataset.
///
/// Cloning is cheap and clones can be used from several threads: every call
/// builds its own selection and never mutates the dataset.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    dataset: Arc<TripDataset>,
    heatmap_shape: usize,
    fare_bins: BinSpec,
}

impl QueryEngine {
    pub fn new(dataset: Arc<TripDataset>, config: &Config) -> TaxiResult<Self> {
        if dataset.is_empty() {
            warn!("trip dataset is empty, every query will return zero counts");
        }
        Ok(Self {
            dataset,
            heatmap_shape: config.heatmap_shape,
            fare_bins: config.fare_bins()?,
        })
    }

    /// Number of trips within `hours`
    pub fn count(&self, hours: Option<HourRange>) -> TaxiResult<u64> {
        let _span = info_span!("count").entered();
        let selection = build_hour_selection(hours);
        let mut counter = Counter::new();
        for batch in self.dataset.batches() {
            let mask = selection.mask(batch)?;
            counter.aggregate_batch(batch.num_rows(), mask.as_ref());
        }
        Ok(counter.count)
    }

    pub fn heatmap(&self, hours: Option<HourRange>, bbox: BoundingBox) -> TaxiResult<HeatmapGrid> {
        let _span = info_span!("heatmap").entered();
        compute_heatmap(&self.dataset, hours, bbox, self.heatmap_shape)
    }

    pub fn trip_details(
        &self,
        hours: Option<HourRange>,
        start: Point,
        end: Point,
    ) -> TaxiResult<TripDetails> {
        let _span = info_span!("trip_details").entered();
        compute_trip_details(&self.dataset, hours, start, end, self.fare_bins)
    }

    /// Trip details plus the most likely fare
    pub fn trip_summary(
        &self,
        hours: Option<HourRange>,
        start: Point,
        end: Point,
    ) -> TaxiResult<(TripDetails, Peak)> {
        let details = self.trip_details(hours, start, end)?;
        let peak = find_peak(&details.fare_histogram);
        Ok((details, peak))
    }
}
