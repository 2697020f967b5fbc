mod aggregate;
mod filter;
mod models;
pub use aggregate::*;
pub use filter::*;
pub use models::*;

use std::time::Instant;
use tracing::{debug, info};

use crate::source::{self, LoadReport, TripTable};

/// The raw station and trip collections of one session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub stations: Box<[Station]>,
    pub trips: Box<[Trip]>,
    pub report: LoadReport,
}

impl Dataset {
    /// Keeps the row accounting of `table` next to the trips it produced.
    pub fn new(stations: Vec<Station>, table: TripTable) -> Self {
        Self {
            stations: stations.into(),
            trips: table.trips.into(),
            report: table.report,
        }
    }

    /// Reads both collections. Depending on the size of the trip table this
    /// can be a long blocking call.
    pub fn load(reader: &source::Reader) -> Result<Self, source::Error> {
        let now = Instant::now();
        let stations = reader.read_stations()?;
        let table = reader.read_trips()?;
        info!(
            "Loaded {} stations and {} trips ({} rejected)",
            stations.len(),
            table.report.accepted,
            table.report.rejected
        );
        debug!("Loading dataset took {:?}", now.elapsed());
        Ok(Self::new(stations, table))
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.trips.is_empty()
    }
}
