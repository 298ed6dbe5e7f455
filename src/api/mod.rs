pub mod error;
pub mod health;
pub mod predict;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::service::AppState;
use error::ApiError;

/// Large enough for a year of five-channel rows
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let server = state.cfg.server.clone();

    let mut router = Router::new()
        .route("/", get(predict::root))
        .route("/predict/consumption", post(predict::predict_consumption))
        .route("/match/producers", post(predict::match_producers))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .fallback(not_found)
        .with_state(state);

    if server.enable_cors {
        match HeaderValue::from_str(&server.cors_origin) {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(AllowOrigin::exact(origin))
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers([header::CONTENT_TYPE]);
                router = router.layer(cors);
            }
            Err(e) => {
                warn!(origin = %server.cors_origin, error = %e, "invalid CORS origin, CORS disabled");
            }
        }
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
        )
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

#[cfg(feature = "metrics")]
pub fn with_metrics(app: Router) -> Router {
    use axum_prometheus::PrometheusMetricLayer;
    let (layer, handle) = PrometheusMetricLayer::pair();

    let metrics_router =
        Router::new().route("/metrics", get(move || async move { handle.render() }));

    app.layer(layer).merge(metrics_router)
}
