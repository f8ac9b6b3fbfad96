//! CLI entry point for the taxi trip explorer.
//!
//! Runs the dashboard queries from the command line and warms the local
//! cache of a dataset before interactive use.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use taxi_explorer::prefetch::warm_columns;
use taxi_explorer::session::{DEFAULT_TRIP_END, DEFAULT_TRIP_START};
use taxi_explorer::{
    logging, BoundingBox, Config, HourRange, Point, QueryEngine, ReadOptions, TaxiError,
    TaxiResult, TripDataset, TripSummary,
};

#[derive(Parser)]
#[command(name = "taxi-explorer")]
#[command(about = "Explore pickup density and fares of taxi trips", long_about = None)]
struct Cli {
    /// Parquet dataset; defaults to $TAXI_PATH
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Only use the leading N rows (0 = all)
    #[arg(long, global = true)]
    row_limit: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct HourArgs {
    /// Pickup hour range, inclusive
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    hours: Option<Vec<u8>>,
}

impl HourArgs {
    fn range(&self) -> TaxiResult<Option<HourRange>> {
        match self.hours.as_deref() {
            Some([min, max]) => Ok(Some(HourRange::new(*min, *max)?)),
            Some(_) => Err(TaxiError::InvalidInput("--hours takes MIN MAX".into())),
            None => Ok(None),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read every trip column once so it is cached locally
    Prefetch,
    /// Count trips within an hour range
    Count {
        #[command(flatten)]
        hours: HourArgs,
    },
    /// Pickup density grid over a viewport
    Heatmap {
        #[command(flatten)]
        hours: HourArgs,

        /// Viewport as LON_MIN LON_MAX LAT_MIN LAT_MAX
        #[arg(long, num_args = 4, allow_negative_numbers = true)]
        limits: Option<Vec<f64>>,
    },
    /// Trip count, fare histogram and most likely fare between two points
    Trip {
        #[command(flatten)]
        hours: HourArgs,

        /// Trip start as LON LAT
        #[arg(long, num_args = 2, allow_negative_numbers = true)]
        start: Option<Vec<f64>>,

        /// Trip end as LON LAT
        #[arg(long, num_args = 2, allow_negative_numbers = true)]
        end: Option<Vec<f64>>,

        /// Repeat the query and report timings
        #[arg(long, default_value_t = 1)]
        runs: usize,
    },
}

fn point_arg(values: Option<&[f64]>, default: Point) -> TaxiResult<Point> {
    match values {
        Some([lon, lat]) => Point::new(*lon, *lat),
        Some(_) => Err(TaxiError::InvalidInput("a point takes LON LAT".into())),
        None => Ok(default),
    }
}

fn print_json<T: Serialize>(value: &T) -> TaxiResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_engine(config: &Config) -> TaxiResult<QueryEngine> {
    let options = ReadOptions {
        batch_size: config.batch_size,
        row_limit: config.row_limit,
    };
    let dataset = TripDataset::open(&config.taxi_path, &options)?;
    QueryEngine::new(Arc::new(dataset), config)
}

fn main() -> TaxiResult<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.path {
        config.taxi_path = path;
    }
    if let Some(limit) = cli.row_limit {
        config.row_limit = (limit > 0).then_some(limit);
    }

    match cli.command {
        Commands::Prefetch => {
            let options = ReadOptions {
                batch_size: config.batch_size,
                row_limit: config.row_limit,
            };
            info!(path = %config.taxi_path.display(), "warming column cache");
            let warmed = warm_columns(&config.taxi_path, &options)?;
            if cli.json {
                print_json(&warmed)?;
            } else {
                for column in &warmed {
                    println!(
                        "{:<20} {:>12} rows {:>8} ms",
                        column.column, column.rows, column.elapsed_ms
                    );
                }
            }
        }
        Commands::Count { hours } => {
            let engine = load_engine(&config)?;
            let count = engine.count(hours.range()?)?;
            if cli.json {
                print_json(&count)?;
            } else {
                println!("Number of rides: {}", count);
            }
        }
        Commands::Heatmap { hours, limits } => {
            let bbox = match limits.as_deref() {
                Some([lon_min, lon_max, lat_min, lat_max]) => {
                    BoundingBox::from_ranges([*lon_min, *lon_max], [*lat_min, *lat_max])?
                }
                Some(_) => {
                    return Err(TaxiError::InvalidInput(
                        "--limits takes LON_MIN LON_MAX LAT_MIN LAT_MAX".into(),
                    ))
                }
                None => BoundingBox::default(),
            };
            let engine = load_engine(&config)?;
            let start = Instant::now();
            let grid = engine.heatmap(hours.range()?, bbox)?;
            let elapsed = start.elapsed();
            if cli.json {
                print_json(&grid)?;
            } else {
                println!("Heatmap {}x{}", grid.shape, grid.shape);
                println!("{:-<40}", "");
                println!("  Trips in view: {}", grid.total());
                println!("  Busiest cell:  {}", grid.max());
                println!("  Time:          {:.2} ms", elapsed.as_secs_f64() * 1000.0);
            }
        }
        Commands::Trip {
            hours,
            start,
            end,
            runs,
        } => {
            let hours = hours.range()?;
            let trip_start = point_arg(start.as_deref(), DEFAULT_TRIP_START)?;
            let trip_end = point_arg(end.as_deref(), DEFAULT_TRIP_END)?;
            let engine = load_engine(&config)?;

            let mut times = Vec::with_capacity(runs.max(1));
            let mut result = None;
            for _ in 0..runs.max(1) {
                let start = Instant::now();
                result = Some(engine.trip_summary(hours, trip_start, trip_end)?);
                times.push(start.elapsed().as_secs_f64() * 1000.0);
            }
            let Some((details, peak)) = result else {
                return Ok(());
            };

            if cli.json {
                print_json(&serde_json::json!({
                    "count": details.count,
                    "fare_histogram": details.fare_histogram,
                    "peak": peak,
                }))?;
            } else {
                println!("{}", TripSummary { count: details.count, peak });
                println!();
                println!("{:>10} {:>10}", "fare", "rides");
                println!("{:-<21}", "");
                let histogram = &details.fare_histogram;
                for (center, count) in histogram.centers().iter().zip(histogram.counts()) {
                    println!("{:>10.2} {:>10}", center, count);
                }

                let mean = times.iter().sum::<f64>() / times.len() as f64;
                let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                println!();
                println!("Performance ({} runs):", times.len());
                println!("{:-<40}", "");
                println!("  Mean:   {:.2} ms", mean);
                println!("  Min:    {:.2} ms", min);
                println!("  Max:    {:.2} ms", max);
            }
        }
    }

    Ok(())
}
