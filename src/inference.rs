//! Inference Engine

use crate::{features::FeatureVector, models::*, PhishError};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Real-time URL inference engine
pub struct InferenceEngine {
    /// Loaded classifier, read-only after startup
    classifier: Arc<UrlClassifier>,
    /// Stats
    stats: Arc<RwLock<InferenceStats>>,
}

impl InferenceEngine {
    /// Create an engine around a loaded classifier
    pub fn new(classifier: UrlClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
            stats: Arc::new(RwLock::new(InferenceStats::default())),
        }
    }

    /// Extract features from a URL and classify them
    pub fn analyze(&self, url: &str) -> Result<UrlVerdict, PhishError> {
        let start = Instant::now();

        let features = FeatureVector::from_url(url);
        let prediction = self.classifier.predict(&features)?;

        let elapsed_us = start.elapsed().as_micros() as u64;
        {
            let mut stats = self.stats.write();
            stats.total_inferences += 1;
            stats.total_latency_us += elapsed_us;
            if prediction.verdict == Verdict::Phishing {
                stats.phishing_verdicts += 1;
            }
        }

        tracing::debug!(url, verdict = %prediction.verdict, elapsed_us, "URL classified");

        Ok(UrlVerdict {
            request_id: Uuid::new_v4(),
            url: url.to_string(),
            prediction: prediction.verdict,
            label: prediction.label,
            inference_time_us: elapsed_us,
        })
    }

    /// Loaded classifier
    pub fn classifier(&self) -> &UrlClassifier {
        &self.classifier
    }

    /// Get inference stats
    pub fn stats(&self) -> InferenceStats {
        self.stats.read().clone()
    }
}

/// Verdict for one URL
#[derive(Debug, Clone, Serialize)]
pub struct UrlVerdict {
    /// Unique id of this request
    pub request_id: Uuid,
    /// URL as submitted
    pub url: String,
    /// Class name
    pub prediction: Verdict,
    /// Raw class label (0 legitimate, 1 phishing)
    pub label: usize,
    /// Extraction plus prediction time
    pub inference_time_us: u64,
}

/// Inference statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct InferenceStats {
    /// URLs classified since startup
    pub total_inferences: u64,
    /// Summed inference time
    pub total_latency_us: u64,
    /// URLs classified as phishing
    pub phishing_verdicts: u64,
}

impl InferenceStats {
    /// Average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        if self.total_inferences == 0 { 0.0 }
        else { self.total_latency_us as f64 / self.total_inferences as f64 }
    }

    /// Share of verdicts that were phishing
    pub fn phishing_ratio(&self) -> f64 {
        if self.total_inferences == 0 { 0.0 }
        else { self.phishing_verdicts as f64 / self.total_inferences as f64 }
    }
}
