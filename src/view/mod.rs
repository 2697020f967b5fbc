mod marker;
pub mod projection;

pub use marker::*;
pub use projection::*;

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tracing::debug;

use crate::{encoding::Scales, shared::Identifiable, traffic::StationTraffic};

/// What a [`MarkerLayer::bind`] call changed, by station key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub entered: Vec<Arc<str>>,
    pub updated: Vec<Arc<str>>,
    pub exited: Vec<Arc<str>>,
}

/// The rendered markers, keyed by station `short_name`.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: HashMap<Arc<str>, Marker>,
    // Draw order, follows the last bound collection.
    order: Vec<Arc<str>>,
    next_id: u64,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Joins `stations` against the current markers. New stations get a new
    /// marker, known stations keep theirs and only change radius, flow ratio
    /// and tooltip, missing stations lose their marker.
    pub fn bind(&mut self, stations: &[StationTraffic], scales: &Scales) -> Reconciliation {
        let mut reconciliation = Reconciliation::default();
        let incoming: HashSet<&str> = stations.iter().map(|station| station.id()).collect();

        self.markers.retain(|id, _| {
            let keep = incoming.contains(&**id);
            if !keep {
                reconciliation.exited.push(id.clone());
            }
            keep
        });

        let mut order: Vec<Arc<str>> = Vec::with_capacity(stations.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(stations.len());
        for station in stations.iter() {
            // First occurrence of a key wins.
            if !seen.insert(station.id()) {
                continue;
            }
            let id = &station.station.short_name;
            if let Some(marker) = self.markers.get_mut(id) {
                marker.update(station, scales);
                reconciliation.updated.push(id.clone());
            } else {
                let marker = Marker::new(MarkerId(self.next_id), station, scales);
                self.next_id += 1;
                self.markers.insert(id.clone(), marker);
                reconciliation.entered.push(id.clone());
            }
            order.push(id.clone());
        }
        self.order = order;

        debug!(
            "Bound markers: {} entered, {} updated, {} exited",
            reconciliation.entered.len(),
            reconciliation.updated.len(),
            reconciliation.exited.len()
        );
        reconciliation
    }

    /// Recomputes every marker's screen position. Safe to call at any time,
    /// it does not depend on a preceding bind.
    pub fn reposition<P>(&mut self, projector: &P)
    where
        P: Projector + ?Sized,
    {
        self.markers.values_mut().for_each(|marker| {
            marker.position = Some(projector.project(marker.coordinate));
        });
    }

    pub fn get(&self, station_id: &str) -> Option<&Marker> {
        self.markers.get(station_id)
    }

    /// Markers in draw order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.order.iter().filter_map(|id| self.markers.get(id))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.order.clear();
    }
}

#[cfg(test)]
fn traffic(id: &str, departures: u32, arrivals: u32) -> StationTraffic {
    use crate::{shared::Coordinate, traffic::Station};
    StationTraffic {
        station: Station::new(id, Coordinate::new(42.0, -71.0)),
        arrivals,
        departures,
    }
}

#[cfg(test)]
fn keys(ids: &[&str]) -> Vec<Arc<str>> {
    ids.iter().map(|id| Arc::from(*id)).collect()
}

#[test]
fn enter_update_exit() {
    use crate::shared::time::TimeFilter;
    let mut layer = MarkerLayer::new();
    let first = vec![traffic("A", 1, 0), traffic("B", 0, 1)];
    let reconciliation = layer.bind(&first, &Scales::new(&first, TimeFilter::Any));
    assert_eq!(reconciliation.entered, keys(&["A", "B"]));
    assert!(reconciliation.updated.is_empty());
    assert!(reconciliation.exited.is_empty());
    let a = layer.get("A").unwrap().id;

    let second = vec![traffic("C", 2, 2), traffic("A", 4, 0)];
    let reconciliation = layer.bind(&second, &Scales::new(&second, TimeFilter::Any));
    assert_eq!(reconciliation.entered, keys(&["C"]));
    assert_eq!(reconciliation.updated, keys(&["A"]));
    assert_eq!(reconciliation.exited, keys(&["B"]));

    assert_eq!(layer.len(), 2);
    assert!(layer.get("B").is_none());
    let marker = layer.get("A").unwrap();
    assert_eq!(marker.id, a);
    assert_eq!(marker.tooltip, "4 trips (4 departures, 0 arrivals)");
    assert_eq!(marker.radius, 25.0);
    assert_eq!(marker.departure_ratio, crate::encoding::FlowBucket::Departures);

    let order: Vec<&str> = layer.markers().map(|marker| &*marker.station_id).collect();
    assert_eq!(order, vec!["C", "A"]);
}

#[test]
fn returning_station_gets_new_handle() {
    use crate::shared::time::TimeFilter;
    let mut layer = MarkerLayer::new();
    let with_a = vec![traffic("A", 1, 1)];
    let scales = Scales::new(&with_a, TimeFilter::Any);
    layer.bind(&with_a, &scales);
    let old = layer.get("A").unwrap().id;
    layer.bind(&[], &scales);
    assert!(layer.is_empty());
    layer.bind(&with_a, &scales);
    assert_ne!(layer.get("A").unwrap().id, old);
}

#[test]
fn duplicate_keys_bind_once() {
    use crate::shared::time::TimeFilter;
    let mut layer = MarkerLayer::new();
    let stations = vec![traffic("A", 1, 0), traffic("A", 5, 5)];
    let reconciliation = layer.bind(&stations, &Scales::new(&stations, TimeFilter::Any));
    assert_eq!(reconciliation.entered, keys(&["A"]));
    assert!(reconciliation.updated.is_empty());
    assert_eq!(layer.markers().count(), 1);
    assert_eq!(layer.get("A").unwrap().tooltip, "1 trips (1 departures, 0 arrivals)");
}

#[test]
fn reposition_without_bind() {
    let mut layer = MarkerLayer::new();
    layer.reposition(&Viewport::default());
    assert!(layer.is_empty());
}

#[test]
fn reposition_is_idempotent() {
    use crate::shared::{ScreenPoint, time::TimeFilter};
    let mut layer = MarkerLayer::new();
    let stations = vec![traffic("A", 1, 0)];
    layer.bind(&stations, &Scales::new(&stations, TimeFilter::Any));
    assert_eq!(layer.get("A").unwrap().position, None);

    let projector = |coordinate: crate::shared::Coordinate| {
        ScreenPoint::new(coordinate.longitude * 2.0, coordinate.latitude * 2.0)
    };
    layer.reposition(&projector);
    let first = layer.get("A").unwrap().position;
    layer.reposition(&projector);
    assert_eq!(layer.get("A").unwrap().position, first);
    assert_eq!(first, Some(ScreenPoint::new(-142.0, 84.0)));
}
