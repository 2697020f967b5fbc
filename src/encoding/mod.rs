//! Scales turning station traffic into marker appearance.
//!
//! Both scales are plain values rebuilt for every aggregation pass, nothing is
//! carried over between filter changes.

use serde::Serialize;

use crate::{shared::time::TimeFilter, traffic::StationTraffic};

/// Radius range with no time filter.
pub const RADIUS_RANGE: (f64, f64) = (0.0, 25.0);
/// Radius range while a time filter narrows the trips.
pub const FILTERED_RADIUS_RANGE: (f64, f64) = (3.0, 50.0);

/// Square root scale from total traffic to marker radius, so marker area
/// grows linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain_max: f64,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(max_traffic: u32, filter: TimeFilter) -> Self {
        let range = if filter.is_active() {
            FILTERED_RADIUS_RANGE
        } else {
            RADIUS_RANGE
        };
        Self {
            domain_max: f64::from(max_traffic),
            range,
        }
    }

    pub fn from_stations(stations: &[StationTraffic], filter: TimeFilter) -> Self {
        let max_traffic = stations
            .iter()
            .map(StationTraffic::total_traffic)
            .max()
            .unwrap_or(0);
        Self::new(max_traffic, filter)
    }

    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.domain_max)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn radius(&self, traffic: u32) -> f64 {
        let (start, end) = self.range;
        // All stations idle, nothing to scale against.
        if self.domain_max <= 0.0 {
            return start;
        }
        let t = f64::from(traffic).sqrt() / self.domain_max.sqrt();
        start + t * (end - start)
    }
}

/// Color bucket of a station's departure share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowBucket {
    /// Mostly arrivals.
    Arrivals,
    Balanced,
    /// Mostly departures.
    Departures,
}

impl FlowBucket {
    /// Position in the palette, `0`, `0.5` or `1`.
    pub const fn value(&self) -> f64 {
        match self {
            Self::Arrivals => 0.0,
            Self::Balanced => 0.5,
            Self::Departures => 1.0,
        }
    }
}

impl Serialize for FlowBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// Quantizes `[0, 1]` into three equal buckets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowScale;

impl FlowScale {
    const BUCKETS: [FlowBucket; 3] = [
        FlowBucket::Arrivals,
        FlowBucket::Balanced,
        FlowBucket::Departures,
    ];

    pub fn thresholds(&self) -> [f64; 2] {
        [1.0 / 3.0, 2.0 / 3.0]
    }

    /// Values outside the domain land in the outer buckets.
    pub fn quantize(&self, ratio: f64) -> FlowBucket {
        let index = self
            .thresholds()
            .iter()
            .filter(|threshold| **threshold <= ratio)
            .count();
        Self::BUCKETS[index]
    }

    /// A station without traffic has no departure share and is drawn as balanced.
    pub fn bucket(&self, station: &StationTraffic) -> FlowBucket {
        station
            .departure_ratio()
            .map_or(FlowBucket::Balanced, |ratio| self.quantize(ratio))
    }
}

/// Scales configured for one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub radius: RadiusScale,
    pub flow: FlowScale,
}

impl Scales {
    pub fn new(stations: &[StationTraffic], filter: TimeFilter) -> Self {
        Self {
            radius: RadiusScale::from_stations(stations, filter),
            flow: FlowScale,
        }
    }
}

#[test]
fn radius_range_follows_filter() {
    use crate::shared::time::Minute;
    for max in [0, 1, 100, 250_000] {
        assert_eq!(RadiusScale::new(max, TimeFilter::Any).range(), (0.0, 25.0));
        assert_eq!(
            RadiusScale::new(max, TimeFilter::At(Minute::new(480).unwrap())).range(),
            (3.0, 50.0)
        );
    }
}

#[test]
fn radius_is_square_root() {
    let scale = RadiusScale::new(100, TimeFilter::Any);
    assert_eq!(scale.radius(0), 0.0);
    assert_eq!(scale.radius(25), 12.5);
    assert_eq!(scale.radius(100), 25.0);
}

#[test]
fn filtered_radius_starts_at_three() {
    use crate::shared::time::Minute;
    let scale = RadiusScale::new(400, TimeFilter::At(Minute::new(480).unwrap()));
    assert_eq!(scale.radius(0), 3.0);
    assert_eq!(scale.radius(100), 26.5);
    assert_eq!(scale.radius(400), 50.0);
}

#[test]
fn domain_is_busiest_station() {
    use crate::{shared::Coordinate, traffic::Station};
    let traffic = |arrivals, departures| StationTraffic {
        station: Station::new("A32000", Coordinate::default()),
        arrivals,
        departures,
    };
    let stations = [traffic(1, 2), traffic(40, 41), traffic(0, 0)];
    let scale = RadiusScale::from_stations(&stations, TimeFilter::Any);
    assert_eq!(scale.domain(), (0.0, 81.0));
    assert_eq!(scale.radius(81), 25.0);
    assert_eq!(RadiusScale::from_stations(&[], TimeFilter::Any).domain(), (0.0, 0.0));
}

#[test]
fn idle_domain_uses_range_start() {
    use crate::shared::time::Minute;
    assert_eq!(RadiusScale::new(0, TimeFilter::Any).radius(0), 0.0);
    assert_eq!(
        RadiusScale::new(0, TimeFilter::At(Minute::MIDNIGHT)).radius(0),
        3.0
    );
}

#[test]
fn flow_buckets() {
    let flow = FlowScale;
    assert_eq!(flow.quantize(0.2), FlowBucket::Arrivals);
    assert_eq!(flow.quantize(0.5), FlowBucket::Balanced);
    assert_eq!(flow.quantize(0.9), FlowBucket::Departures);
    assert_eq!(flow.quantize(0.0), FlowBucket::Arrivals);
    assert_eq!(flow.quantize(1.0 / 3.0), FlowBucket::Balanced);
    assert_eq!(flow.quantize(2.0 / 3.0), FlowBucket::Departures);
    assert_eq!(flow.quantize(1.0), FlowBucket::Departures);
}

#[test]
fn idle_station_is_balanced() {
    use crate::{shared::Coordinate, traffic::Station};
    let station = StationTraffic {
        station: Station::new("M32006", Coordinate::default()),
        arrivals: 0,
        departures: 0,
    };
    assert_eq!(FlowScale.bucket(&station), FlowBucket::Balanced);
    assert_eq!(FlowScale.bucket(&station).value(), 0.5);
}
