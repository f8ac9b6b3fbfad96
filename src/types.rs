//! Validated value types for query inputs.
//!
//! Everything that arrives from a user (hour slider, map clicks, viewport)
//! is checked here so the aggregation code can assume well-formed input.

use serde::Serialize;

use crate::error::{TaxiError, TaxiResult};

pub const MIN_HOUR: u8 = 0;
pub const MAX_HOUR: u8 = 23;

/// Inclusive pickup-hour range, `0 <= min <= max <= 23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    min: u8,
    max: u8,
}

impl HourRange {
    pub fn new(min: u8, max: u8) -> TaxiResult<Self> {
        if max > MAX_HOUR {
            return Err(TaxiError::InvalidInput(format!(
                "hour {} is outside 0..=23",
                max
            )));
        }
        if min > max {
            return Err(TaxiError::InvalidInput(format!(
                "hour range [{}, {}] is out of order",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// The whole day, equivalent to no filtering at all.
    pub fn full_day() -> Self {
        Self {
            min: MIN_HOUR,
            max: MAX_HOUR,
        }
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, hour: i32) -> bool {
        hour >= self.min as i32 && hour <= self.max as i32
    }
}

/// A `(longitude, latitude)` location in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> TaxiResult<Self> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(TaxiError::InvalidInput(format!(
                "point ({}, {}) is not finite",
                longitude, latitude
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

/// `[min, max]` along one axis, `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Limits {
    min: f64,
    max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> TaxiResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(TaxiError::InvalidInput(format!(
                "limits [{}, {}] must be finite and increasing",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Heatmap viewport in longitude/latitude space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub longitude: Limits,
    pub latitude: Limits,
}

impl BoundingBox {
    pub fn new(longitude: Limits, latitude: Limits) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from `[[lon_min, lon_max], [lat_min, lat_max]]` as sent by a plot relayout.
    pub fn from_ranges(longitude: [f64; 2], latitude: [f64; 2]) -> TaxiResult<Self> {
        Ok(Self {
            longitude: Limits::new(longitude[0], longitude[1])?,
            latitude: Limits::new(latitude[0], latitude[1])?,
        })
    }
}

impl Default for BoundingBox {
    /// New York City, JFK to the Bronx.
    fn default() -> Self {
        Self {
            longitude: Limits {
                min: -74.05,
                max: -73.75,
            },
            latitude: Limits {
                min: 40.58,
                max: 40.90,
            },
        }
    }
}
