pub mod geo;
pub mod time;

pub use geo::*;
pub use time::*;

pub trait Identifiable {
    fn id(&self) -> &str;
}
