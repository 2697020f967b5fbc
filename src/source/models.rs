use serde::{Deserialize, Serialize};

/// One entry of a GBFS `station_information` feed.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawStation {
    pub short_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawStationData {
    pub stations: Vec<RawStation>,
}

/// Station feeds come either wrapped in the GBFS envelope or as a bare list.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawStationFeed {
    Envelope { data: RawStationData },
    List(Vec<RawStation>),
}

impl From<RawStationFeed> for Vec<RawStation> {
    fn from(value: RawStationFeed) -> Self {
        match value {
            RawStationFeed::Envelope { data } => data.stations,
            RawStationFeed::List(stations) => stations,
        }
    }
}

/// One row of a trip table. Timestamps stay as text until ingestion.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawTrip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: String,
    pub ended_at: String,
    #[serde(default)]
    pub ride_id: Option<String>,
    #[serde(default)]
    pub rideable_type: Option<String>,
    #[serde(default)]
    pub member_casual: Option<String>,
}
