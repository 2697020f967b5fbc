use bikeflow::{prelude::*, source};
use std::{cell::Cell, collections::HashMap, io};

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture_dataset() -> Dataset {
    let config = Config {
        stations_path: fixture("stations.json").into(),
        trips_path: fixture("trips.csv").into(),
    };
    Dataset::load(&Reader::new(config)).unwrap()
}

fn flat(coordinate: Coordinate) -> ScreenPoint {
    ScreenPoint::new(coordinate.longitude, -coordinate.latitude)
}

fn ids(layer: &MarkerLayer) -> HashMap<String, MarkerId> {
    layer
        .markers()
        .map(|marker| (marker.station_id.to_string(), marker.id))
        .collect()
}

#[test]
fn initial_load_shows_totals_test() {
    let mut controller = Controller::new(flat);
    assert_eq!(controller.state(), LoadState::Loading);
    controller.dispatch(Event::DataReady(fixture_dataset()));

    assert_eq!(controller.state(), LoadState::Ready);
    assert_eq!(controller.filter(), TimeFilter::Any);
    assert_eq!(controller.label(), "(any time)");

    let tooltips: Vec<(&str, &str)> = controller
        .markers()
        .map(|marker| (&*marker.station_id, marker.tooltip.as_str()))
        .collect();
    assert_eq!(
        tooltips,
        vec![
            ("A32000", "6 trips (3 departures, 3 arrivals)"),
            ("A32001", "2 trips (1 departures, 1 arrivals)"),
            ("B32002", "3 trips (1 departures, 2 arrivals)"),
            ("M32006", "0 trips (0 departures, 0 arrivals)"),
        ]
    );

    let layer = controller.layer();
    assert_eq!(layer.get("A32000").unwrap().radius, 25.0);
    assert_eq!(layer.get("M32006").unwrap().radius, 0.0);
    assert_eq!(
        layer.get("M32006").unwrap().departure_ratio,
        FlowBucket::Balanced
    );
    let kendall = layer.get("A32000").unwrap();
    assert_eq!(kendall.position, Some(ScreenPoint::new(-71.08498, -42.362242)));
    assert_eq!(kendall.style.fill, "steelblue");
    assert_eq!(kendall.style.stroke, "white");
    assert_eq!(kendall.style.stroke_width, 1.0);
    assert_eq!(kendall.style.opacity, 0.8);
}

#[test]
fn slider_updates_markers_in_place_test() {
    let mut controller = Controller::new(flat);
    controller.dispatch(Event::DataReady(fixture_dataset()));
    let before = ids(controller.layer());

    controller.dispatch(Event::SliderInput(480));
    assert_eq!(controller.label(), "8:00 AM");
    assert!(controller.filter().is_active());

    let after = ids(controller.layer());
    assert_eq!(before, after);
    let reconciliation = controller.last_reconciliation().unwrap();
    assert!(reconciliation.entered.is_empty());
    assert!(reconciliation.exited.is_empty());
    assert_eq!(reconciliation.updated.len(), 4);

    let layer = controller.layer();
    let kendall = layer.get("A32000").unwrap();
    assert_eq!(kendall.tooltip, "3 trips (2 departures, 1 arrivals)");
    assert_eq!(kendall.radius, 50.0);
    assert_eq!(kendall.departure_ratio, FlowBucket::Departures);
    let central = layer.get("B32002").unwrap();
    assert_eq!(central.tooltip, "1 trips (0 departures, 1 arrivals)");
    assert_eq!(central.departure_ratio, FlowBucket::Arrivals);
    assert_eq!(layer.get("M32006").unwrap().radius, 3.0);

    controller.dispatch(Event::SliderInput(-1));
    assert_eq!(controller.label(), "(any time)");
    assert_eq!(ids(controller.layer()), before);
    assert_eq!(
        controller.layer().get("A32000").unwrap().tooltip,
        "6 trips (3 departures, 3 arrivals)"
    );
}

#[test]
fn invalid_slider_input_is_ignored_test() {
    let mut controller = Controller::new(flat);
    controller.dispatch(Event::DataReady(fixture_dataset()));
    controller.dispatch(Event::SliderInput(600));
    controller.dispatch(Event::SliderInput(1440));
    assert_eq!(controller.label(), "10:00 AM");
    assert_eq!(i32::from(controller.filter()), 600);
}

#[test]
fn slider_before_data_test() {
    let mut controller = Controller::new(flat);
    controller.dispatch(Event::SliderInput(480));
    assert_eq!(controller.label(), "8:00 AM");
    assert!(controller.layer().is_empty());
    assert!(controller.last_reconciliation().is_none());

    // The first run uses the filter chosen while loading.
    controller.dispatch(Event::DataReady(fixture_dataset()));
    assert_eq!(
        controller.layer().get("A32000").unwrap().tooltip,
        "3 trips (2 departures, 1 arrivals)"
    );
}

#[test]
fn failed_load_stays_empty_test() {
    let mut controller = Controller::new(flat);
    let err = source::Error::Io(io::Error::new(io::ErrorKind::NotFound, "stations.json"));
    controller.dispatch(Event::LoadFailed(err));
    assert_eq!(controller.state(), LoadState::Failed);

    controller.dispatch(Event::SliderInput(300));
    controller.dispatch(Event::ViewportChanged);
    assert_eq!(controller.label(), "5:00 AM");
    assert!(controller.layer().is_empty());
    assert!(controller.dataset().is_empty());

    controller.dispatch(Event::DataReady(fixture_dataset()));
    assert_eq!(controller.state(), LoadState::Failed);
    assert!(controller.layer().is_empty());
}

#[test]
fn empty_dataset_test() {
    let mut controller = Controller::new(flat);
    controller.dispatch(Event::DataReady(Dataset::default()));
    controller.dispatch(Event::SliderInput(720));
    assert_eq!(controller.state(), LoadState::Ready);
    assert!(controller.layer().is_empty());
}

#[test]
fn viewport_change_only_repositions_test() {
    let calls = Cell::new(0);
    let offset = Cell::new(0.0);
    let projector = |coordinate: Coordinate| {
        calls.set(calls.get() + 1);
        ScreenPoint::new(coordinate.longitude + offset.get(), coordinate.latitude)
    };
    let mut controller = Controller::new(projector);
    controller.dispatch(Event::DataReady(fixture_dataset()));
    assert_eq!(calls.get(), 4);
    let reconciliation = controller.last_reconciliation().cloned();

    offset.set(100.0);
    controller.dispatch(Event::ViewportChanged);
    assert_eq!(calls.get(), 8);
    assert_eq!(controller.last_reconciliation().cloned(), reconciliation);
    let kendall = controller.layer().get("A32000").unwrap();
    assert_eq!(
        kendall.position,
        Some(ScreenPoint::new(-71.08498 + 100.0, 42.362242))
    );

    // Same viewport, same positions.
    controller.dispatch(Event::ViewportChanged);
    assert_eq!(
        controller.layer().get("A32000").unwrap().position,
        Some(ScreenPoint::new(-71.08498 + 100.0, 42.362242))
    );
}

#[test]
fn web_mercator_controller_test() {
    let mut controller = Controller::new(Viewport::default());
    controller.dispatch(Event::DataReady(fixture_dataset()));
    let before = controller.layer().get("A32000").unwrap().position.unwrap();

    let moved = Viewport::new(
        Coordinate::new(42.36027, -71.08),
        12.0,
        1024.0,
        768.0,
    );
    controller.set_projector(moved);
    controller.dispatch(Event::ViewportChanged);
    let after = controller.layer().get("A32000").unwrap().position.unwrap();
    // Center moved east, the station moves left on screen.
    assert!(after.x < before.x);
    assert!((after.y - before.y).abs() < 1e-9);
}
