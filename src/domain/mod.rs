pub mod error;
pub mod series;
pub mod summary;

pub use error::*;
pub use series::*;
pub use summary::*;
