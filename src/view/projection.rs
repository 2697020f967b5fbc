use std::f64::consts::{FRAC_PI_4, PI};

use crate::shared::geo::{Coordinate, ScreenPoint};

pub const EARTH_RADIUS: f64 = 6378137.0;
/// Pixel size of one tile at zoom 0.
pub const TILE_SIZE: f64 = 512.0;
pub const MIN_ZOOM: f64 = 5.0;
pub const MAX_ZOOM: f64 = 18.0;
/// Mercator is undefined at the poles, map engines cut it off here.
pub const MAX_LATITUDE: f64 = 85.051129;

/// Maps geographic coordinates to screen pixels for the current viewport.
/// Called for every marker on every viewport change, keep it cheap.
pub trait Projector {
    fn project(&self, coordinate: Coordinate) -> ScreenPoint;
}

impl<F> Projector for F
where
    F: Fn(Coordinate) -> ScreenPoint,
{
    fn project(&self, coordinate: Coordinate) -> ScreenPoint {
        self(coordinate)
    }
}

/// Lat/lon (EPSG:4326) to Web Mercator (EPSG:3857) meters.
pub fn to_web_mercator(coordinate: Coordinate) -> (f64, f64) {
    let latitude = coordinate.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS * coordinate.longitude.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// What the map currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            // Cambridge, MA
            center: Coordinate::new(42.36027, -71.09415),
            zoom: 12.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn new(center: Coordinate, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Screen pixels per Web Mercator meter.
    pub fn pixels_per_meter(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2() / (2.0 * PI * EARTH_RADIUS)
    }
}

impl Projector for Viewport {
    fn project(&self, coordinate: Coordinate) -> ScreenPoint {
        let (center_x, center_y) = to_web_mercator(self.center);
        let (x, y) = to_web_mercator(coordinate);
        let scale = self.pixels_per_meter();
        // Screen y grows downwards.
        ScreenPoint::new(
            (x - center_x) * scale + self.width / 2.0,
            (center_y - y) * scale + self.height / 2.0,
        )
    }
}

#[test]
fn center_is_middle_of_screen() {
    let viewport = Viewport::default();
    let point = viewport.project(viewport.center);
    assert!((point.x - 512.0).abs() < 1e-9);
    assert!((point.y - 384.0).abs() < 1e-9);
}

#[test]
fn north_is_up_east_is_right() {
    let viewport = Viewport::default();
    let north_east = Coordinate::new(
        viewport.center.latitude + 0.01,
        viewport.center.longitude + 0.01,
    );
    let point = viewport.project(north_east);
    assert!(point.x > 512.0);
    assert!(point.y < 384.0);
}

#[test]
fn zooming_in_doubles_offsets() {
    let near = Viewport::default();
    let close = Viewport::new(near.center, near.zoom + 1.0, near.width, near.height);
    let station = Coordinate::new(42.3601, -71.0589);
    let a = near.project(station);
    let b = close.project(station);
    assert!(((b.x - 512.0) - 2.0 * (a.x - 512.0)).abs() < 1e-6);
    assert!(((b.y - 384.0) - 2.0 * (a.y - 384.0)).abs() < 1e-6);
}

#[test]
fn zoom_is_clamped() {
    let viewport = Viewport::new(Coordinate::default(), 30.0, 100.0, 100.0);
    assert_eq!(viewport.zoom, MAX_ZOOM);
    let viewport = Viewport::new(Coordinate::default(), 0.0, 100.0, 100.0);
    assert_eq!(viewport.zoom, MIN_ZOOM);
}
