use bikeflow::{prelude::*, source};
use std::io::{Cursor, Write};

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture_config() -> Config {
    Config {
        stations_path: fixture("stations.json").into(),
        trips_path: fixture("trips.csv").into(),
    }
}

#[test]
fn load_stations_test() {
    let stations = Reader::new(fixture_config()).read_stations().unwrap();
    let ids: Vec<&str> = stations.iter().map(|station| station.id()).collect();
    assert_eq!(ids, vec!["A32000", "A32001", "B32002", "M32006"]);

    let kendall = &stations[0];
    assert_eq!(kendall.name.as_deref(), Some("Kendall T"));
    assert_eq!(kendall.capacity, Some(27));
    assert_eq!(kendall.coordinate, Coordinate::new(42.362242, -71.08498));
    assert_eq!(stations[2].capacity, None);
}

#[test]
fn load_trips_test() {
    let table = Reader::new(fixture_config()).read_trips().unwrap();
    assert_eq!(
        table.report,
        LoadReport {
            accepted: 6,
            rejected: 1
        }
    );
    let rides: Vec<&str> = table
        .trips
        .iter()
        .filter_map(|trip| trip.ride_id.as_deref())
        .collect();
    assert_eq!(rides, vec!["r1", "r2", "r3", "r4", "r6", "r7"]);

    let first = &table.trips[0];
    assert_eq!(&*first.start_station_id, "A32000");
    assert_eq!(&*first.end_station_id, "A32001");
    assert_eq!(first.started_minute().as_minutes(), 485);
    assert_eq!(first.ended_minute().as_minutes(), 500);
    assert_eq!(first.rideable_type.as_deref(), Some("classic_bike"));
    assert_eq!(first.member_casual.as_deref(), Some("member"));
}

#[test]
fn load_dataset_test() {
    let dataset = Dataset::load(&Reader::new(fixture_config())).unwrap();
    assert_eq!(dataset.stations.len(), 4);
    assert_eq!(dataset.trips.len(), 6);
    assert_eq!(dataset.report.rejected, 1);
    assert!(!dataset.is_empty());
}

#[test]
fn missing_file_test() {
    let config = Config {
        stations_path: fixture("does-not-exist.json").into(),
        trips_path: fixture("trips.csv").into(),
    };
    let result = Dataset::load(&Reader::new(config));
    assert!(matches!(result, Err(source::Error::Io(_))));
}

#[test]
fn bare_station_list_test() {
    let json = r#"[{"short_name": "D32005", "lat": 42.35, "lon": -71.06}]"#;
    let stations = source::stations_from_reader(json.as_bytes()).unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(&*stations[0].short_name, "D32005");
    assert_eq!(stations[0].name, None);
}

#[test]
fn station_without_short_name_test() {
    let json = r#"{"data": {"stations": [{"name": "Nowhere", "lat": 0.0, "lon": 0.0}]}}"#;
    let result = source::stations_from_reader(json.as_bytes());
    assert!(matches!(result, Err(source::Error::Json(_))));
}

#[test]
fn duplicate_station_keeps_first_test() {
    let json = r#"[
        {"short_name": "A32000", "name": "first", "lat": 1.0, "lon": 1.0},
        {"short_name": "A32000", "name": "second", "lat": 2.0, "lon": 2.0}
    ]"#;
    let stations = source::stations_from_reader(json.as_bytes()).unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].name.as_deref(), Some("first"));
}

#[test]
fn short_row_is_rejected_test() {
    let csv = "start_station_id,end_station_id,started_at,ended_at\n\
               A,B,2024-03-01 10:00:00,2024-03-01 10:30:00\n\
               A,B,2024-03-01 10:00:00\n\
               B,A,2024-03-01 11:00:00,2024-03-01 11:15:00\n";
    let table = source::trips_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(table.report.accepted, 2);
    assert_eq!(table.report.rejected, 1);
}

fn zipped(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn zipped_trips_test() {
    let csv = std::fs::read_to_string(fixture("trips.csv")).unwrap();
    let bytes = zipped(&[
        ("README.txt", "Bluebikes trip data"),
        ("202403-bluebikes-tripdata.csv", &csv),
    ]);

    let table = source::trips_from_zip(Cursor::new(bytes.as_slice())).unwrap();
    assert_eq!(table.report.accepted, 6);

    let table = source::trips_from_bytes(&bytes).unwrap();
    assert_eq!(table.report.accepted, 6);
    assert_eq!(table.report.rejected, 1);
}

#[test]
fn zip_without_csv_test() {
    let bytes = zipped(&[("README.txt", "nothing here")]);
    let result = source::trips_from_bytes(&bytes);
    assert!(matches!(result, Err(source::Error::FileNotFound(_))));
}

#[test]
fn plain_bytes_test() {
    let csv = std::fs::read(fixture("trips.csv")).unwrap();
    let table = source::trips_from_bytes(&csv).unwrap();
    assert_eq!(table.trips.len(), 6);
}

#[test]
fn dataset_keeps_load_report_test() {
    let stations = std::fs::read(fixture("stations.json")).unwrap();
    let trips = std::fs::read(fixture("trips.csv")).unwrap();
    let dataset = Dataset::new(
        source::stations_from_reader(stations.as_slice()).unwrap(),
        source::trips_from_bytes(&trips).unwrap(),
    );
    assert_eq!(dataset.stations.len(), 4);
    assert_eq!(dataset.trips.len(), 6);
    assert_eq!(
        dataset.report,
        LoadReport {
            accepted: 6,
            rejected: 1
        }
    );
}
