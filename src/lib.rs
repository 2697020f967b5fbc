pub mod controller;
pub mod encoding;
pub mod shared;
pub mod source;
pub mod traffic;
pub mod view;

pub mod prelude {
    pub use crate::controller::{Controller, Event, LoadState};
    pub use crate::encoding::{FlowBucket, FlowScale, RadiusScale, Scales};
    pub use crate::shared::{
        Identifiable,
        geo::{Coordinate, ScreenPoint},
        time::{Minute, TimeFilter, minutes_since_midnight, parse_timestamp},
    };
    pub use crate::source::{Config, LoadReport, Reader, TripTable};
    pub use crate::traffic::{
        Dataset, Station, StationTraffic, Trip, compute_station_traffic, filter_trips,
    };
    pub use crate::view::{Marker, MarkerId, MarkerLayer, Projector, Reconciliation, Viewport};
}
