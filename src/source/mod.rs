use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader, Cursor, Read, Seek},
    path::Path,
    sync::Arc,
    time::Instant,
};
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
use models::*;

use crate::traffic::{Station, Trip};

/// Columns a trip table must carry.
pub const REQUIRED_TRIP_COLUMNS: [&str; 4] =
    ["start_station_id", "end_station_id", "started_at", "ended_at"];

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Trip table is missing column {0}")]
    MissingHeader(String),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

/// Row accounting for a trip table. Rejected rows never reach aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TripTable {
    pub trips: Vec<Trip>,
    pub report: LoadReport,
}

/// Reads the station feed and trip table named by a [`Config`].
#[derive(Default)]
pub struct Reader {
    config: Config,
}

impl Reader {
    pub fn new(config: self::Config) -> Self {
        Self { config }
    }

    pub fn read_stations(&self) -> Result<Vec<Station>, self::Error> {
        let file = File::open(&self.config.stations_path)?;
        stations_from_reader(BufReader::new(file))
    }

    /// Plain CSV, or the first CSV inside the archive when the path ends in `.zip`.
    pub fn read_trips(&self) -> Result<TripTable, self::Error> {
        let path = &self.config.trips_path;
        let file = File::open(path)?;
        if is_zip_path(path) {
            trips_from_zip(BufReader::new(file))
        } else {
            trips_from_reader(BufReader::new(file))
        }
    }
}

fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("zip"))
}

pub fn stations_from_reader<R: Read>(reader: R) -> Result<Vec<Station>, self::Error> {
    debug!("Loading stations...");
    let now = Instant::now();
    let feed: RawStationFeed = serde_json::from_reader(reader)?;
    let raw: Vec<RawStation> = feed.into();

    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let stations: Vec<Station> = raw
        .into_iter()
        .filter(|station| {
            let fresh = seen.insert(station.short_name.clone());
            if !fresh {
                warn!("Duplicate station {}, keeping the first entry", station.short_name);
            }
            fresh
        })
        .map(Station::from)
        .collect();
    debug!(
        "Loading {} stations took {:?}",
        stations.len(),
        now.elapsed()
    );
    Ok(stations)
}

pub fn trips_from_reader<R: Read>(reader: R) -> Result<TripTable, self::Error> {
    debug!("Loading trips...");
    let now = Instant::now();
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_TRIP_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(Error::MissingHeader(missing.to_string()));
    }

    // Station ids repeat across millions of rows, share one allocation each.
    let mut ids: HashSet<Arc<str>> = HashSet::new();
    let mut intern = |id: String| -> Arc<str> {
        if let Some(id) = ids.get(id.as_str()) {
            id.clone()
        } else {
            let id: Arc<str> = id.into();
            ids.insert(id.clone());
            id
        }
    };

    let mut table = TripTable::default();
    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                debug!("Skipping trip on line {line}: {err}");
                table.report.rejected += 1;
                continue;
            }
        };
        match Trip::from_raw(raw, &mut intern) {
            Ok(trip) => {
                table.trips.push(trip);
                table.report.accepted += 1;
            }
            Err(err) => {
                debug!("Skipping trip on line {line}: {err}");
                table.report.rejected += 1;
            }
        }
    }

    if table.report.rejected > 0 {
        warn!(
            "Rejected {} malformed trips out of {}",
            table.report.rejected,
            table.report.accepted + table.report.rejected
        );
    }
    debug!(
        "Loading {} trips took {:?}",
        table.report.accepted,
        now.elapsed()
    );
    Ok(table)
}

/// Reads the alphabetically first `.csv` entry of a zip archive.
pub fn trips_from_zip<R: Read + Seek>(reader: R) -> Result<TripTable, self::Error> {
    let mut archive = ZipArchive::new(reader)?;
    let name = archive
        .file_names()
        .filter(|name| name.ends_with(".csv") && !name.starts_with("__MACOSX"))
        .min()
        .map(str::to_string)
        .ok_or(Error::FileNotFound("*.csv".to_string()))?;
    debug!("Reading trips from archive entry {name}");
    let file = archive.by_name(&name)?;
    trips_from_reader(file)
}

/// For downloaded trip tables, zipped or not.
pub fn trips_from_bytes(bytes: &[u8]) -> Result<TripTable, self::Error> {
    if bytes.starts_with(&ZIP_MAGIC) {
        trips_from_zip(Cursor::new(bytes))
    } else {
        trips_from_reader(bytes)
    }
}

#[test]
fn zip_path_detection() {
    assert!(is_zip_path(Path::new("202403-bluebikes-tripdata.zip")));
    assert!(is_zip_path(Path::new("TRIPS.ZIP")));
    assert!(!is_zip_path(Path::new("bluebikes-traffic-2024-03.csv")));
    assert!(!is_zip_path(Path::new("zip")));
}

#[test]
fn missing_column_is_an_error() {
    let csv = "start_station_id,started_at,ended_at\nA,2024-03-01 00:10:00,2024-03-01 00:40:00\n";
    match trips_from_reader(csv.as_bytes()) {
        Err(Error::MissingHeader(column)) => assert_eq!(column, "end_station_id"),
        other => panic!("expected missing header, got {other:?}"),
    }
}

#[test]
fn required_columns_in_any_order() {
    let csv = "\u{feff}ride_id,ended_at,end_station_id,started_at,start_station_id\n\
               r1,2024-03-01 00:40:00,B,2024-03-01 00:10:00,A\n";
    let table = trips_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.report, LoadReport { accepted: 1, rejected: 0 });
    assert_eq!(&*table.trips[0].start_station_id, "A");
    assert_eq!(&*table.trips[0].end_station_id, "B");
    assert_eq!(table.trips[0].ride_id.as_deref(), Some("r1"));
}

#[test]
fn station_ids_are_interned() {
    let csv = "start_station_id,end_station_id,started_at,ended_at\n\
               A,B,2024-03-01 00:10:00,2024-03-01 00:40:00\n\
               B,A,2024-03-01 01:10:00,2024-03-01 01:40:00\n";
    let table = trips_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.trips.len(), 2);
    assert!(Arc::ptr_eq(
        &table.trips[0].start_station_id,
        &table.trips[1].end_station_id
    ));
}
