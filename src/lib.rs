//! Pickup heatmaps and fare histograms over a static taxi trip dataset.
//!
//! A [`QueryEngine`] answers the three questions behind the trip explorer:
//! where do trips start within an hour range ([`heatmap`]), how many trips go
//! between two clicked points and what they cost ([`trips`]), and the most
//! likely fare ([`peak`]).

pub mod aggregator;
pub mod binning;
pub mod config;
pub mod dataset;
pub mod error;
pub mod expressions;
pub mod filter;
pub mod heatmap;
pub mod logging;
pub mod peak;
pub mod prefetch;
pub mod query;
pub mod reader;
pub mod session;
pub mod trips;
pub mod types;
pub mod utils;

pub use config::Config;
pub use dataset::TripDataset;
pub use error::{TaxiError, TaxiResult};
pub use filter::{build_hour_selection, Condition, Selection};
pub use heatmap::{compute_heatmap, HeatmapGrid};
pub use peak::{find_peak, Peak};
pub use query::QueryEngine;
pub use reader::ReadOptions;
pub use session::{Session, TripSummary};
pub use trips::{compute_trip_details, FareHistogram, TripDetails, MATCH_RADIUS};
pub use types::{BoundingBox, HourRange, Limits, Point};
