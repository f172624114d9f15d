pub mod hover;
pub mod panel;
pub mod zoom_gate;

pub use hover::*;
pub use panel::*;
pub use zoom_gate::*;
