pub mod engine;
pub mod forecaster;
pub mod formula;

pub use engine::*;
pub use forecaster::*;
pub use formula::*;
