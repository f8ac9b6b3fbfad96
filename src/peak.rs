//! Most likely value of a histogram

use serde::Serialize;

use crate::trips::FareHistogram;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Bin center of the mode, rounded to 2 decimals
    pub value: f64,
    pub index: usize,
    /// Every bin was zero; `value` is then the center of bin 0
    pub is_empty_histogram: bool,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bin center at the first index of the maximum count.
///
/// An all-zero histogram yields bin 0 rather than an error; check
/// [`Peak::is_empty_histogram`] to tell that apart from a real mode in bin 0.
pub fn find_peak(histogram: &FareHistogram) -> Peak {
    let mut index = 0;
    let mut best = 0u64;
    for (i, &count) in histogram.counts().iter().enumerate() {
        // strict: ties keep the earliest bin
        if count > best {
            best = count;
            index = i;
        }
    }

    Peak {
        value: round2(histogram.centers()[index]),
        index,
        is_empty_histogram: best == 0,
    }
}
