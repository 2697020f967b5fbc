use std::path::PathBuf;

pub struct Config {
    pub stations_path: PathBuf,
    pub trips_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations_path: "bluebikes-stations.json".into(),
            trips_path: "bluebikes-traffic-2024-03.csv".into(),
        }
    }
}
