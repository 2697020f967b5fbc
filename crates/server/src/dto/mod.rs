mod marker;
pub use marker::*;
