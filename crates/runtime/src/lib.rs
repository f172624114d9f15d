pub mod frame;
pub mod pacer;
pub mod throttle;
pub mod timer;

pub use frame::*;
pub use pacer::*;
pub use throttle::*;
pub use timer::*;
