pub mod error;
pub mod geojson;
pub mod species;
pub mod split_index;

pub use error::*;
pub use geojson::*;
pub use species::*;
pub use split_index::*;
