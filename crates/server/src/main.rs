mod api;
mod dto;
mod load;
mod state;

use crate::state::AppState;
use axum::routing::get;
use bikeflow::prelude::*;
use std::{env, sync::Arc, time::Instant};
use tracing::{error, info};

const DEFAULT_PORT: u16 = 3000;

fn setting(args: &[String], index: usize, var: &str, default: String) -> String {
    args.get(index)
        .cloned()
        .or_else(|| env::var(var).ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let args: Vec<_> = env::args().collect();
    let defaults = Config::default();
    let stations = setting(
        &args,
        1,
        "BIKEFLOW_STATIONS",
        defaults.stations_path.display().to_string(),
    );
    let trips = setting(
        &args,
        2,
        "BIKEFLOW_TRIPS",
        defaults.trips_path.display().to_string(),
    );
    let port = match env::var("BIKEFLOW_PORT") {
        Ok(port) => match port.parse::<u16>() {
            Ok(port) => port,
            Err(err) => {
                error!("Invalid BIKEFLOW_PORT {port:?}: {err}");
                std::process::exit(1);
            }
        },
        Err(_) => DEFAULT_PORT,
    };

    let mut controller = Controller::new(Viewport::default());
    let now = Instant::now();
    match load::load_dataset(&stations, &trips).await {
        Ok(dataset) => controller.dispatch(Event::DataReady(dataset)),
        // The map stays empty but the server keeps answering.
        Err(err) => controller.dispatch(Event::LoadFailed(err)),
    }
    info!("Loading data took {:?}", now.elapsed());
    let state = Arc::new(AppState::new(controller));

    let app = axum::Router::new()
        .route("/markers", get(api::markers))
        .route("/viewport", get(api::viewport))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
