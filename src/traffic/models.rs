use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    shared::{
        Identifiable,
        geo::Coordinate,
        time::{self, Minute, minutes_since_midnight, parse_timestamp},
    },
    source::models::{RawStation, RawTrip},
};

/// A docking location. Immutable once loaded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Station {
    /// Unique key stations and trips are joined on.
    pub short_name: Arc<str>,
    pub coordinate: Coordinate,
    pub name: Option<Arc<str>>,
    pub station_id: Option<Arc<str>>,
    pub capacity: Option<u32>,
}

impl Station {
    pub fn new(short_name: &str, coordinate: Coordinate) -> Self {
        Self {
            short_name: short_name.into(),
            coordinate,
            ..Default::default()
        }
    }
}

impl Identifiable for Station {
    fn id(&self) -> &str {
        &self.short_name
    }
}

impl From<RawStation> for Station {
    fn from(value: RawStation) -> Self {
        Self {
            short_name: value.short_name.into(),
            coordinate: Coordinate::new(value.lat, value.lon),
            name: value.name.map(|val| val.into()),
            station_id: value.station_id.map(|val| val.into()),
            capacity: value.capacity,
        }
    }
}

/// One rental. Station ids are not required to match a known station.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: Arc<str>,
    pub end_station_id: Arc<str>,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub ride_id: Option<Arc<str>>,
    pub rideable_type: Option<Arc<str>>,
    pub member_casual: Option<Arc<str>>,
}

impl Trip {
    pub fn new(
        start_station_id: &str,
        end_station_id: &str,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Self {
            start_station_id: start_station_id.into(),
            end_station_id: end_station_id.into(),
            started_at,
            ended_at,
            ride_id: None,
            rideable_type: None,
            member_casual: None,
        }
    }

    /// Parses the timestamps of a raw row. `intern` maps station ids to shared strings.
    pub fn from_raw<F>(value: RawTrip, intern: &mut F) -> Result<Self, time::Error>
    where
        F: FnMut(String) -> Arc<str>,
    {
        let started_at = parse_timestamp(&value.started_at)?;
        let ended_at = parse_timestamp(&value.ended_at)?;
        Ok(Self {
            start_station_id: intern(value.start_station_id),
            end_station_id: intern(value.end_station_id),
            started_at,
            ended_at,
            ride_id: value.ride_id.map(|val| val.into()),
            rideable_type: value.rideable_type.map(|val| val.into()),
            member_casual: value.member_casual.map(|val| val.into()),
        })
    }

    pub fn started_minute(&self) -> Minute {
        minutes_since_midnight(&self.started_at)
    }

    pub fn ended_minute(&self) -> Minute {
        minutes_since_midnight(&self.ended_at)
    }
}

/// A station with the trip counts of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station: Station,
    pub arrivals: u32,
    pub departures: u32,
}

impl StationTraffic {
    pub fn total_traffic(&self) -> u32 {
        self.arrivals + self.departures
    }

    /// Share of the traffic that leaves the station, `None` without traffic.
    pub fn departure_ratio(&self) -> Option<f64> {
        match self.total_traffic() {
            0 => None,
            total => Some(f64::from(self.departures) / f64::from(total)),
        }
    }
}

impl Identifiable for StationTraffic {
    fn id(&self) -> &str {
        &self.station.short_name
    }
}

#[test]
fn total_is_sum_of_counts() {
    let traffic = StationTraffic {
        station: Station::new("A32000", Coordinate::default()),
        arrivals: 4,
        departures: 6,
    };
    assert_eq!(traffic.total_traffic(), 10);
    assert_eq!(traffic.departure_ratio(), Some(0.6));
}

#[test]
fn no_ratio_without_traffic() {
    let traffic = StationTraffic {
        station: Station::new("A32000", Coordinate::default()),
        arrivals: 0,
        departures: 0,
    };
    assert_eq!(traffic.departure_ratio(), None);
}
