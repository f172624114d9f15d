pub mod geo;
pub mod handles;
pub mod mercator;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use handles::*;
pub use time::*;
