//! HTTP API

use crate::{features::FeatureVector, InferenceEngine, InferenceStats, PhishError, UrlVerdict};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared handler state
pub struct AppState {
    /// Inference engine with the loaded model
    pub engine: InferenceEngine,
}

impl AppState {
    /// Wrap an engine as router state
    pub fn new(engine: InferenceEngine) -> Self {
        Self { engine }
    }
}

/// Build the API router
pub fn build_router(state: Arc<AppState>, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/predict", post(predict))
        .route("/features", post(features))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Request body of `/predict` and `/features`
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    /// URL to analyze
    pub url: String,
}

impl UrlRequest {
    fn validated(&self) -> Result<&str, PhishError> {
        if self.url.is_empty() {
            return Err(PhishError::InvalidRequest("url must not be empty".into()));
        }
        Ok(&self.url)
    }
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<UrlVerdict>, PhishError> {
    let url = req.validated()?;
    state.engine.analyze(url).map(Json)
}

#[derive(Serialize)]
struct FeaturesResponse {
    url: String,
    features: FeatureVector,
}

async fn features(Json(req): Json<UrlRequest>) -> Result<Json<FeaturesResponse>, PhishError> {
    let url = req.validated()?;
    Ok(Json(FeaturesResponse {
        features: FeatureVector::from_url(url),
        url: url.to_string(),
    }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    model_features: usize,
    model_version: Option<String>,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let classifier = state.engine.classifier();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model_features: classifier.feature_names().len(),
        model_version: classifier.version().map(str::to_string),
    })
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    totals: InferenceStats,
    avg_latency_us: f64,
    phishing_ratio: f64,
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let totals = state.engine.stats();
    Json(StatsResponse {
        avg_latency_us: totals.avg_latency_us(),
        phishing_ratio: totals.phishing_ratio(),
        totals,
    })
}
