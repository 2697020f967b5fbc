use std::collections::HashMap;

use rayon::prelude::*;

use crate::traffic::{Station, StationTraffic, Trip};

type Counts<'a> = HashMap<&'a str, u32>;

fn count_by<'a, F>(trips: &'a [Trip], key: F) -> Counts<'a>
where
    F: Fn(&'a Trip) -> &'a str + Sync + Send,
{
    trips
        .par_iter()
        .fold(Counts::new, |mut counts, trip| {
            *counts.entry(key(trip)).or_insert(0) += 1;
            counts
        })
        .reduce(Counts::new, |mut acc, counts| {
            counts.into_iter().for_each(|(id, count)| {
                *acc.entry(id).or_insert(0) += count;
            });
            acc
        })
}

/// Counts departures and arrivals for every station in `stations`.
///
/// `stations` must be the pristine list and `trips` the currently filtered
/// set. Stations without trips get zero counts, trips naming unknown
/// stations are ignored. Output order follows `stations`.
pub fn compute_station_traffic(stations: &[Station], trips: &[Trip]) -> Vec<StationTraffic> {
    let departures = count_by(trips, |trip| &*trip.start_station_id);
    let arrivals = count_by(trips, |trip| &*trip.end_station_id);

    stations
        .iter()
        .map(|station| {
            let id: &str = &station.short_name;
            StationTraffic {
                station: station.clone(),
                arrivals: arrivals.get(id).copied().unwrap_or(0),
                departures: departures.get(id).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
fn trip(start: &str, end: &str) -> Trip {
    let time = crate::shared::time::parse_timestamp("2024-03-01 08:00:00").unwrap();
    Trip::new(start, end, time, time)
}

#[test]
fn counts_by_direction() {
    use crate::shared::Coordinate;
    let stations = vec![
        Station::new("A", Coordinate::default()),
        Station::new("B", Coordinate::default()),
        Station::new("C", Coordinate::default()),
    ];
    let trips = vec![trip("A", "B"), trip("A", "C"), trip("B", "A"), trip("C", "C")];
    let traffic = compute_station_traffic(&stations, &trips);

    let counts: Vec<_> = traffic
        .iter()
        .map(|station| (station.departures, station.arrivals, station.total_traffic()))
        .collect();
    assert_eq!(counts, vec![(2, 1, 3), (1, 1, 2), (1, 2, 3)]);
}

#[test]
fn unknown_stations_are_ignored() {
    use crate::shared::Coordinate;
    let stations = vec![Station::new("A", Coordinate::default())];
    let trips = vec![trip("A", "Z9"), trip("", "Q1")];
    let traffic = compute_station_traffic(&stations, &trips);
    assert_eq!(traffic.len(), 1);
    assert_eq!(traffic[0].departures, 1);
    assert_eq!(traffic[0].arrivals, 0);
}

#[test]
fn empty_inputs() {
    assert!(compute_station_traffic(&[], &[]).is_empty());
}
