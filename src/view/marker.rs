use std::sync::Arc;

use crate::{
    encoding::{FlowBucket, Scales},
    shared::geo::{Coordinate, ScreenPoint},
    traffic::StationTraffic,
};

/// Handle of a rendered marker. Stays the same for as long as the station
/// stays on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub(crate) u64);

impl MarkerId {
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Appearance shared by every marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            fill: "steelblue",
            stroke: "white",
            stroke_width: 1.0,
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub station_id: Arc<str>,
    pub coordinate: Coordinate,
    pub radius: f64,
    /// Exposed to the renderer as `--departure-ratio`.
    pub departure_ratio: FlowBucket,
    pub style: MarkerStyle,
    pub tooltip: String,
    /// `None` until the first reposition pass.
    pub position: Option<ScreenPoint>,
}

impl Marker {
    pub(crate) fn new(id: MarkerId, station: &StationTraffic, scales: &Scales) -> Self {
        Self {
            id,
            station_id: station.station.short_name.clone(),
            coordinate: station.station.coordinate,
            radius: scales.radius.radius(station.total_traffic()),
            departure_ratio: scales.flow.bucket(station),
            style: MarkerStyle::default(),
            tooltip: tooltip(station),
            position: None,
        }
    }

    pub(crate) fn update(&mut self, station: &StationTraffic, scales: &Scales) {
        self.radius = scales.radius.radius(station.total_traffic());
        self.departure_ratio = scales.flow.bucket(station);
        self.tooltip = tooltip(station);
    }
}

/// Hover text of a station marker.
pub fn tooltip(station: &StationTraffic) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        station.total_traffic(),
        station.departures,
        station.arrivals
    )
}

#[test]
fn tooltip_text() {
    use crate::traffic::Station;
    let station = StationTraffic {
        station: Station::new("A32000", Coordinate::default()),
        arrivals: 3,
        departures: 9,
    };
    assert_eq!(tooltip(&station), "12 trips (9 departures, 3 arrivals)");
}
