use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Array, Int8Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;

use taxi_explorer::{
    find_peak, BoundingBox, Config, HourRange, Point, QueryEngine, ReadOptions, Session,
    TaxiResult, TripDataset,
};

const JFK: (f64, f64) = (-73.78223, 40.64438);
const MIDTOWN: (f64, f64) = (-73.99, 40.75);

/// Deterministic trips in the narrow on-disk types of the public taxi files:
/// f32 coordinates and fares, i8 hours.
fn synthetic_trips(n: usize) -> RecordBatch {
    let mut pickup_lon = Vec::with_capacity(n);
    let mut pickup_lat = Vec::with_capacity(n);
    let mut dropoff_lon = Vec::with_capacity(n);
    let mut dropoff_lat = Vec::with_capacity(n);
    let mut hours = Vec::with_capacity(n);
    let mut fares = Vec::with_capacity(n);

    for i in 0..n {
        // a third of the trips run JFK -> Midtown with a small jitter
        let (start, end) = if i % 3 == 0 {
            let jitter = (i % 7) as f64 * 0.0001;
            ((JFK.0 + jitter, JFK.1 - jitter), (MIDTOWN.0 - jitter, MIDTOWN.1 + jitter))
        } else {
            let dx = (i % 101) as f64 * 0.002;
            let dy = (i % 53) as f64 * 0.004;
            ((-74.0 + dx, 40.6 + dy), (-73.9 - dx, 40.85 - dy))
        };
        pickup_lon.push(start.0 as f32);
        pickup_lat.push(start.1 as f32);
        dropoff_lon.push(end.0 as f32);
        dropoff_lat.push(end.1 as f32);
        hours.push((i % 24) as i8);
        // includes fares above the histogram range
        fares.push(((i * 7) % 70) as f32 + 0.5);
    }

    let schema = Schema::new(vec![
        Field::new("pickup_longitude", DataType::Float32, false),
        Field::new("pickup_latitude", DataType::Float32, false),
        Field::new("dropoff_longitude", DataType::Float32, false),
        Field::new("dropoff_latitude", DataType::Float32, false),
        Field::new("pickup_hour", DataType::Int8, false),
        Field::new("total_amount", DataType::Float32, false),
        Field::new("vendor_id", DataType::Int8, false),
    ]);
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float32Array::from(pickup_lon)),
        Arc::new(Float32Array::from(pickup_lat)),
        Arc::new(Float32Array::from(dropoff_lon)),
        Arc::new(Float32Array::from(dropoff_lat)),
        Arc::new(Int8Array::from(hours)),
        Arc::new(Float32Array::from(fares)),
        Arc::new(Int8Array::from(vec![1i8; n])),
    ];
    RecordBatch::try_new(Arc::new(schema), columns).unwrap()
}

fn write_dataset(tag: &str, n: usize) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "taxi_explorer_it_{}_{}.parquet",
        tag,
        std::process::id()
    ));
    let batch = synthetic_trips(n);
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

fn open_engine(tag: &str) -> TaxiResult<(QueryEngine, PathBuf)> {
    let path = write_dataset(tag, 5_000);
    let options = ReadOptions {
        batch_size: 1024,
        row_limit: None,
    };
    let dataset = TripDataset::open(&path, &options)?;
    Ok((QueryEngine::new(Arc::new(dataset), &Config::default())?, path))
}

fn jfk() -> Point {
    Point::new(JFK.0, JFK.1).unwrap()
}

fn midtown() -> Point {
    Point::new(MIDTOWN.0, MIDTOWN.1).unwrap()
}

#[test]
fn test_full_day_matches_no_filter() -> TaxiResult<()> {
    let (engine, path) = open_engine("full_day")?;
    assert_eq!(engine.count(None)?, 5_000);
    assert_eq!(engine.count(Some(HourRange::full_day()))?, 5_000);

    let unfiltered = engine.heatmap(None, BoundingBox::default())?;
    let full_day = engine.heatmap(Some(HourRange::full_day()), BoundingBox::default())?;
    assert_eq!(unfiltered, full_day);

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_hour_range_counts() -> TaxiResult<()> {
    let (engine, path) = open_engine("hour_range")?;
    let range = HourRange::new(12, 15)?;
    let expected = (0..5_000).filter(|i| range.contains(i % 24)).count() as u64;
    assert_eq!(engine.count(Some(range))?, expected);
    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_jfk_to_midtown_scenario() -> TaxiResult<()> {
    let (engine, path) = open_engine("scenario")?;

    let details = engine.trip_details(None, jfk(), midtown())?;
    assert!(details.count > 0);
    assert_eq!(details.fare_histogram.counts().len(), 25);
    assert!(details.fare_histogram.total() <= details.count);
    // fares up to 69.5 exist, so some matches fall outside [0, 50)
    assert!(details.fare_histogram.total() < details.count);

    let peak = find_peak(&details.fare_histogram);
    assert!(!peak.is_empty_histogram);
    assert_eq!(
        details.fare_histogram.counts()[peak.index],
        *details.fare_histogram.counts().iter().max().unwrap()
    );

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_narrower_hours_never_add_trips() -> TaxiResult<()> {
    let (engine, path) = open_engine("monotonic")?;
    let ranges = [
        None,
        Some(HourRange::new(6, 20)?),
        Some(HourRange::new(12, 15)?),
        Some(HourRange::new(13, 13)?),
    ];

    let counts = ranges
        .iter()
        .map(|hours| engine.trip_details(*hours, jfk(), midtown()).map(|d| d.count))
        .collect::<TaxiResult<Vec<_>>>()?;
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);

    std::fs::remove_file(path).ok();
    Ok(())
}

#[test]
fn test_session_drives_queries() -> TaxiResult<()> {
    let (engine, path) = open_engine("session")?;

    // swap the trip direction with two clicks
    let session = Session::default().click(midtown()).click(jfk());
    let forward = engine.trip_details(None, jfk(), midtown())?;
    let reverse = engine.trip_details(session.hours, session.trip_start, session.trip_end)?;
    assert!(forward.count > 0);
    assert_eq!(reverse.count, 0);

    let zoomed = session.relayout(BoundingBox::from_ranges([-73.79, -73.76], [40.62, 40.66])?);
    let grid = engine.heatmap(zoomed.hours, zoomed.heatmap_limits)?;
    assert_eq!(grid.total(), forward.count);

    std::fs::remove_file(path).ok();
    Ok(())
}
