use crate::{dto::MarkersDto, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bikeflow::prelude::*;
use std::{collections::HashMap, sync::Arc};
use tracing::error;

/// Map move, zoom or resize. Missing parameters keep their current value.
/// Only repositions, the trip counts are untouched.
pub async fn viewport(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let mut controller = state.controller.lock().await;
    let current = *controller.projector();

    let latitude = param(&params, "lat", current.center.latitude)?;
    let longitude = param(&params, "lon", current.center.longitude)?;
    let zoom = param(&params, "zoom", current.zoom)?;
    let width = param(&params, "width", current.width)?;
    let height = param(&params, "height", current.height)?;
    if width <= 0.0 || height <= 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let viewport = Viewport::new(Coordinate::new(latitude, longitude), zoom, width, height);
    controller.set_projector(viewport);
    controller.dispatch(Event::ViewportChanged);
    Ok(Json(MarkersDto::from(&controller)).into_response())
}

fn param(params: &HashMap<String, String>, key: &str, default: f64) -> Result<f64, StatusCode> {
    match params.get(key) {
        Some(value) => match value.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => {
                error!("Invalid {key}: {value:?}");
                Err(StatusCode::BAD_REQUEST)
            }
        },
        None => Ok(default),
    }
}
