//! Runtime configuration.
//!
//! Defaults match the interactive dashboard: the first 100 million trips,
//! a 256x256 pickup heatmap and a 25-bin fare histogram over `[0, 50]`.
//! The dataset path can be overridden with `TAXI_PATH`.

use std::path::PathBuf;

use crate::binning::BinSpec;
use crate::error::TaxiResult;
use crate::types::Limits;

pub const TAXI_PATH_ENV_VAR: &str = "TAXI_PATH";
pub const DEFAULT_TAXI_PATH: &str = "data/yellow_taxi.parquet";

/// For demo purposes only the leading 100 million rows are used
pub const DEFAULT_ROW_LIMIT: usize = 100_000_000;
pub const DEFAULT_BATCH_SIZE: usize = 8192;
pub const DEFAULT_HEATMAP_SHAPE: usize = 256;
pub const DEFAULT_FARE_SHAPE: usize = 25;
pub const FARE_LIMITS: (f64, f64) = (0.0, 50.0);

#[derive(Debug, Clone)]
pub struct Config {
    pub taxi_path: PathBuf,
    pub row_limit: Option<usize>,
    pub batch_size: usize,
    pub heatmap_shape: usize,
    pub fare_shape: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxi_path: PathBuf::from(DEFAULT_TAXI_PATH),
            row_limit: Some(DEFAULT_ROW_LIMIT),
            batch_size: DEFAULT_BATCH_SIZE,
            heatmap_shape: DEFAULT_HEATMAP_SHAPE,
            fare_shape: DEFAULT_FARE_SHAPE,
        }
    }
}

impl Config {
    /// Defaults, with the dataset path taken from `TAXI_PATH` when set.
    pub fn from_env() -> Self {
        Self::with_path_override(std::env::var(TAXI_PATH_ENV_VAR).ok())
    }

    fn with_path_override(path: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            config.taxi_path = PathBuf::from(path);
        }
        config
    }

    pub fn fare_bins(&self) -> TaxiResult<BinSpec> {
        BinSpec::new(Limits::new(FARE_LIMITS.0, FARE_LIMITS.1)?, self.fare_shape)
    }
}
