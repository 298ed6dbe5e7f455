//! # Synthetic Energy Data
//!
//! - **patterns**: closed-form daily/weekly curves shared with the forecaster
//! - **history**: noisy multivariate hourly history
//! - **backfill**: validation of caller-supplied rows and filling of missing channels

pub mod backfill;
pub mod history;
pub mod patterns;

pub use backfill::{backfill_missing_channels, SuppliedHistory};
pub use history::{
    generate_history, HistoryGenerator, HistoryGeneratorConfig, CONSUMPTION_FLOOR,
};
