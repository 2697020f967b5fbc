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

/// Slider input. `time` is the minute of day or `-1`, without it the current
/// markers are returned unchanged.
pub async fn markers(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let mut controller = state.controller.lock().await;
    if let Some(time) = params.get("time") {
        let value: i32 = time.parse().map_err(|err| {
            error!("Failed to parse time {time:?}: {err}");
            StatusCode::BAD_REQUEST
        })?;
        TimeFilter::try_from(value).map_err(|err| {
            error!("Rejected time: {err}");
            StatusCode::BAD_REQUEST
        })?;
        controller.dispatch(Event::SliderInput(value));
    }
    Ok(Json(MarkersDto::from(&controller)).into_response())
}
