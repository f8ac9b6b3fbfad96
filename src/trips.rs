//! Trip count and fare histogram between two clicked points

use serde::Serialize;
use tracing::debug;

use crate::aggregator::{Counter, Histogram1d};
use crate::binning::BinSpec;
use crate::dataset::{columns, TripDataset};
use crate::error::{TaxiError, TaxiResult};
use crate::filter::{build_hour_selection, Condition};
use crate::types::{HourRange, Point};
use crate::utils::get_f64_column;

/// One mile is ~0.0145 degrees and NYC has ~20 blocks per mile: 3 blocks.
/// Planar and in degrees, so not geodesically exact.
pub const MATCH_RADIUS: f64 = 0.0145 / 20.0 * 3.0;

/// Fare counts per bin together with the bins they were counted in.
/// Always holds one count and one center per bin, and at least one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareHistogram {
    bins: BinSpec,
    counts: Vec<u64>,
    centers: Vec<f64>,
}

impl FareHistogram {
    pub fn new(bins: BinSpec, counts: Vec<u64>) -> TaxiResult<Self> {
        if counts.len() != bins.shape() {
            return Err(TaxiError::InvalidInput(format!(
                "{} counts for {} bins",
                counts.len(),
                bins.shape()
            )));
        }
        Ok(Self {
            centers: bins.centers(),
            bins,
            counts,
        })
    }

    pub fn bins(&self) -> BinSpec {
        self.bins
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDetails {
    pub count: u64,
    pub fare_histogram: FareHistogram,
}

/// Trips that start within [`MATCH_RADIUS`] of `start`, end within it of
/// `end` and fall inside `hours`. Fares outside `fare_bins` are counted in
/// `count` but not in the histogram.
pub fn compute_trip_details(
    dataset: &TripDataset,
    hours: Option<HourRange>,
    start: Point,
    end: Point,
    fare_bins: BinSpec,
) -> TaxiResult<TripDetails> {
    let selection = build_hour_selection(hours)
        .and(Condition::WithinRadius {
            longitude: columns::PICKUP_LONGITUDE,
            latitude: columns::PICKUP_LATITUDE,
            center: start,
            radius: MATCH_RADIUS,
        })
        .and(Condition::WithinRadius {
            longitude: columns::DROPOFF_LONGITUDE,
            latitude: columns::DROPOFF_LATITUDE,
            center: end,
            radius: MATCH_RADIUS,
        });

    let mut counter = Counter::new();
    let mut fares = Histogram1d::new(fare_bins);

    for batch in dataset.batches() {
        let mask = selection.mask(batch)?;
        if let Some(mask) = &mask {
            if mask.true_count() == 0 {
                continue;
            }
        }

        counter.aggregate_batch(batch.num_rows(), mask.as_ref());
        let amounts = get_f64_column(batch, columns::TOTAL_AMOUNT)?;
        fares.aggregate_batch(mask.as_ref(), amounts);
    }

    let details = TripDetails {
        count: counter.count,
        fare_histogram: FareHistogram::new(fare_bins, fares.into_counts())?,
    };
    debug!(
        count = details.count,
        binned = details.fare_histogram.total(),
        "computed trip details"
    );
    Ok(details)
}
