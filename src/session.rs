//! Per-user dashboard state, passed by value through each interaction

use std::fmt;

use serde::Serialize;

use crate::peak::Peak;
use crate::types::{BoundingBox, HourRange, Point};

/// JFK airport
pub const DEFAULT_TRIP_START: Point = Point {
    longitude: -73.78223,
    latitude: 40.64438,
};

/// Midtown Manhattan
pub const DEFAULT_TRIP_END: Point = Point {
    longitude: -73.99,
    latitude: 40.75,
};

/// Everything the dashboard remembers between events. Handlers take the
/// session by value and return the updated one alongside their outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Session {
    /// Map clicks so far; even counts set the start, odd counts the end
    pub clicks: u64,
    pub trip_start: Point,
    pub trip_end: Point,
    pub hours: Option<HourRange>,
    pub heatmap_limits: BoundingBox,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            clicks: 0,
            trip_start: DEFAULT_TRIP_START,
            trip_end: DEFAULT_TRIP_END,
            hours: None,
            heatmap_limits: BoundingBox::default(),
        }
    }
}

impl Session {
    pub fn click(mut self, point: Point) -> Self {
        if self.clicks % 2 == 0 {
            self.trip_start = point;
        } else {
            self.trip_end = point;
        }
        self.clicks += 1;
        self
    }

    /// The user zoomed or panned the heatmap
    pub fn relayout(mut self, bbox: BoundingBox) -> Self {
        self.heatmap_limits = bbox;
        self
    }

    pub fn with_hours(mut self, hours: Option<HourRange>) -> Self {
        self.hours = hours;
        self
    }
}

/// Human-readable trip statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripSummary {
    pub count: u64,
    pub peak: Peak,
}

impl fmt::Display for TripSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trip statistics:")?;
        writeln!(f, "- Number of rides: {}", self.count)?;
        if self.peak.is_empty_histogram {
            write!(f, "- Most likely total trip cost: n/a")
        } else {
            write!(f, "- Most likely total trip cost: ${:.2}", self.peak.value)
        }
    }
}
