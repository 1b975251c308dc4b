//! OpenSASE PhishGuard
//!
//! Lexical phishing detection for URLs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           PHISHGUARD                                    │
//! │                                                                         │
//! │   POST /predict {"url": ...}                                            │
//! │         │                                                               │
//! │  ┌──────▼───────┐   ┌──────────────────┐   ┌─────────────────────────┐  │
//! │  │     URL      │   │     Feature      │   │      Classifier         │  │
//! │  │  Decomposer  ├──►│    Extractor     ├──►│   (decision tree,       │  │
//! │  │ host/path/qs │   │ 92 counts/lengths│   │    loaded at startup)   │  │
//! │  └──────────────┘   └──────────────────┘   └────────────┬────────────┘  │
//! │                                                         │               │
//! │                                       phishing | legitimate verdict     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod features;
pub mod inference;
pub mod models;
pub mod url;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub use api::{build_router, AppState};
pub use config::ServerConfig;
pub use features::{extract_features, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use inference::{InferenceEngine, InferenceStats, UrlVerdict};
pub use models::{Prediction, UrlClassifier, Verdict};
pub use crate::url::{decompose, DecomposedUrl};

/// PhishGuard error types
#[derive(Debug, Error)]
pub enum PhishError {
    /// Model artifact could not be loaded or validated
    #[error("model error: {0}")]
    Model(String),
    /// Prediction failed for a well-formed request
    #[error("inference error: {0}")]
    Inference(String),
    /// Config file could not be parsed or written
    #[error("config error: {0}")]
    Config(String),
    /// Client sent an unusable request body
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl PhishError {
    fn kind(&self) -> &'static str {
        match self {
            PhishError::Model(_) => "model_error",
            PhishError::Inference(_) => "inference_error",
            PhishError::Config(_) => "config_error",
            PhishError::InvalidRequest(_) => "invalid_request",
            PhishError::Io(_) => "io_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            PhishError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PhishError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
