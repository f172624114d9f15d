pub mod endpoints;
pub mod modality;
pub mod split;
pub mod task;

pub use modality::*;
pub use split::*;
pub use task::*;
