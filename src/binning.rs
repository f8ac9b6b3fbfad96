//! Equal-width binning over a fixed value range

use serde::Serialize;

use crate::error::{TaxiError, TaxiResult};
use crate::types::Limits;

/// `shape` equal-width, half-open bins `[lo, hi)` covering `limits`.
///
/// Values outside the limits (including `max` itself) and NaN fall in no bin;
/// nothing is clamped into the edge bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinSpec {
    limits: Limits,
    shape: usize,
}

impl BinSpec {
    pub fn new(limits: Limits, shape: usize) -> TaxiResult<Self> {
        if shape == 0 {
            return Err(TaxiError::InvalidInput("bin count must be positive".into()));
        }
        Ok(Self { limits, shape })
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn shape(&self) -> usize {
        self.shape
    }

    pub fn width(&self) -> f64 {
        self.limits.width() / self.shape as f64
    }

    #[inline(always)]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let scaled = (value - self.limits.min()) / self.limits.width();
        // NaN fails both comparisons
        if scaled >= 0.0 && scaled < 1.0 {
            // guard against rounding up to `shape` just below max
            Some(((scaled * self.shape as f64) as usize).min(self.shape - 1))
        } else {
            None
        }
    }

    pub fn centers(&self) -> Vec<f64> {
        let width = self.width();
        (0..self.shape)
            .map(|i| self.limits.min() + (i as f64 + 0.5) * width)
            .collect()
    }
}
