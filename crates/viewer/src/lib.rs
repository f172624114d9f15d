pub mod controller;
pub mod events;
pub mod state;

pub use controller::*;
pub use events::*;
pub use state::*;
