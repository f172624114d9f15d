pub mod manager;
pub mod style;
pub mod surface;

pub use manager::*;
pub use style::*;
pub use surface::*;
