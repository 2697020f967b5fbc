use bikeflow::{prelude::*, source};
use futures_util::StreamExt;
use reqwest::header::ACCEPT_ENCODING;
use std::{io, time::Instant};
use tracing::{debug, info};

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Reads a file path or downloads a URL into memory.
async fn read_location(location: &str) -> Result<Vec<u8>, source::Error> {
    if !is_url(location) {
        return Ok(tokio::fs::read(location).await?);
    }

    let response = reqwest::Client::new()
        .get(location)
        .header(ACCEPT_ENCODING, "gzip, deflate")
        .send()
        .await
        .map_err(io::Error::other)?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(io::Error::other(format!("{location} answered {status}")).into());
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let data = chunk.map_err(io::Error::other)?;
        bytes.extend_from_slice(&data);
    }
    Ok(bytes)
}

/// Loads the station feed and trip table from files or URLs.
pub async fn load_dataset(stations: &str, trips: &str) -> Result<Dataset, source::Error> {
    let now = Instant::now();
    info!("Loading stations from {stations}");
    let station_bytes = read_location(stations).await?;
    let stations = source::stations_from_reader(station_bytes.as_slice())?;

    info!("Loading trips from {trips}");
    let trip_bytes = read_location(trips).await?;
    let table = source::trips_from_bytes(&trip_bytes)?;

    debug!("Loading data took {:?}", now.elapsed());
    Ok(Dataset::new(stations, table))
}
