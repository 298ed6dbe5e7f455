use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::forecast::ForecastEngine;
use crate::simulation::{HistoryGenerator, HistoryGeneratorConfig};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub engine: Arc<ForecastEngine>,
}

impl AppState {
    /// Built once at startup; nothing is constructed at load time
    pub fn new(cfg: Config) -> Self {
        let generator = HistoryGenerator::new(HistoryGeneratorConfig {
            random_seed: cfg.generator.random_seed,
        });
        let engine = ForecastEngine::with_formula(generator);

        info!(
            forecaster = engine.forecaster_name(),
            default_history_hours = cfg.generator.default_history_hours,
            seeded = cfg.generator.random_seed.is_some(),
            "forecast engine ready"
        );

        Self::with_engine(cfg, engine)
    }

    /// State around an already built engine, e.g. one with a custom forecaster
    pub fn with_engine(cfg: Config, engine: ForecastEngine) -> Self {
        Self {
            cfg: Arc::new(cfg),
            engine: Arc::new(engine),
        }
    }
}
