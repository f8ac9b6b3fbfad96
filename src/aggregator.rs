//! Binned count accumulators
//!
//! Each accumulator consumes one batch at a time under an optional row mask
//! (`None` = every row) and can be merged with a partial result built over
//! other batches.

use arrow::array::{Array, BooleanArray, Float64Array};

use crate::binning::BinSpec;

/// Visit the row indices selected by `mask` whose values are non-null in every `columns`.
#[inline]
fn for_each_selected<F>(
    len: usize,
    mask: Option<&BooleanArray>,
    columns: &[&Float64Array],
    mut f: F,
) where
    F: FnMut(usize),
{
    let valid = |i: usize| columns.iter().all(|c| c.is_valid(i));
    let has_nulls = columns.iter().any(|c| c.null_count() > 0);

    match mask {
        Some(mask) => {
            for i in mask.values().set_indices() {
                if !has_nulls || valid(i) {
                    f(i);
                }
            }
        }
        None => {
            for i in 0..len {
                if !has_nulls || valid(i) {
                    f(i);
                }
            }
        }
    }
}

/// Number of selected rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregate_batch(&mut self, num_rows: usize, mask: Option<&BooleanArray>) {
        self.count += match mask {
            Some(mask) => mask.true_count() as u64,
            None => num_rows as u64,
        };
    }

    pub fn merge(&mut self, other: &Counter) {
        self.count += other.count;
    }
}

/// Counts per bin of one column
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram1d {
    bins: BinSpec,
    counts: Vec<u64>,
}

impl Histogram1d {
    pub fn new(bins: BinSpec) -> Self {
        Self {
            bins,
            counts: vec![0; bins.shape()],
        }
    }

    pub fn aggregate_batch(&mut self, mask: Option<&BooleanArray>, values: &Float64Array) {
        let raw = values.values();
        let bins = self.bins;
        let counts = &mut self.counts;
        for_each_selected(values.len(), mask, &[values], |i| {
            if let Some(bin) = bins.bin_index(raw[i]) {
                counts[bin] += 1;
            }
        });
    }

    pub fn merge(&mut self, other: &Histogram1d) {
        debug_assert_eq!(self.bins, other.bins);
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += *b;
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }
}

/// Counts per `(x bin, y bin)` cell, stored x-major: `counts[x * y_shape + y]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2d {
    x_bins: BinSpec,
    y_bins: BinSpec,
    counts: Vec<u64>,
}

impl Histogram2d {
    pub fn new(x_bins: BinSpec, y_bins: BinSpec) -> Self {
        Self {
            x_bins,
            y_bins,
            counts: vec![0; x_bins.shape() * y_bins.shape()],
        }
    }

    pub fn aggregate_batch(
        &mut self,
        mask: Option<&BooleanArray>,
        xs: &Float64Array,
        ys: &Float64Array,
    ) {
        let (x_raw, y_raw) = (xs.values(), ys.values());
        let (x_bins, y_bins) = (self.x_bins, self.y_bins);
        let y_shape = y_bins.shape();
        let counts = &mut self.counts;
        for_each_selected(xs.len(), mask, &[xs, ys], |i| {
            if let (Some(x), Some(y)) = (x_bins.bin_index(x_raw[i]), y_bins.bin_index(y_raw[i])) {
                counts[x * y_shape + y] += 1;
            }
        });
    }

    pub fn merge(&mut self, other: &Histogram2d) {
        debug_assert_eq!(self.counts.len(), other.counts.len());
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += *b;
        }
    }

    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }
}
