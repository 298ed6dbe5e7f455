//! Synthetic energy history and a closed-form 24-hour consumption/production
//! forecast, served over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod service;
pub mod simulation;
pub mod telemetry;
