mod markers;
mod viewport;
pub use markers::*;
pub use viewport::*;
