use bikeflow::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerDto {
    pub id: u64,
    pub station_id: String,
    pub coordinate: Coordinate,
    pub position: Option<ScreenPoint>,
    pub radius: f64,
    pub departure_ratio: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub tooltip: String,
}

impl MarkerDto {
    pub fn from(marker: &Marker) -> Self {
        Self {
            id: marker.id.as_u64(),
            station_id: marker.station_id.to_string(),
            coordinate: marker.coordinate,
            position: marker.position,
            radius: marker.radius,
            departure_ratio: marker.departure_ratio.value(),
            fill: marker.style.fill.to_string(),
            stroke: marker.style.stroke.to_string(),
            stroke_width: marker.style.stroke_width,
            opacity: marker.style.opacity,
            tooltip: marker.tooltip.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkersDto {
    /// Slider value, `-1` for any time.
    pub filter: i32,
    pub label: String,
    pub ready: bool,
    pub markers: Vec<MarkerDto>,
}

impl MarkersDto {
    pub fn from(controller: &Controller<Viewport>) -> Self {
        Self {
            filter: controller.filter().into(),
            label: controller.label().to_string(),
            ready: controller.state() == LoadState::Ready,
            markers: controller.markers().map(MarkerDto::from).collect(),
        }
    }
}
