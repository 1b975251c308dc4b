//! ML Models
//!
//! The phishing classifier is a `linfa-trees` decision tree trained offline
//! and shipped as a JSON artifact together with the column order it was
//! trained on.

use crate::{features::FeatureVector, PhishError};
use linfa::traits::Predict;
use linfa_trees::DecisionTree;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label the tree emits for a legitimate URL
pub const LABEL_LEGITIMATE: usize = 0;
/// Label the tree emits for a phishing URL
pub const LABEL_PHISHING: usize = 1;

/// Serialized model artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Training-time column order
    pub feature_names: Vec<String>,
    /// Fitted tree
    pub tree: DecisionTree<f64, usize>,
    /// Free-form version tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Phishing URL classifier
pub struct UrlClassifier {
    artifact: ModelArtifact,
    /// Position of each model column in a [`FeatureVector`]
    columns: Vec<usize>,
}

impl UrlClassifier {
    /// Wrap a fitted tree and its column order
    pub fn new(feature_names: Vec<String>, tree: DecisionTree<f64, usize>) -> Result<Self, PhishError> {
        Self::from_artifact(ModelArtifact {
            feature_names,
            tree,
            version: None,
        })
    }

    /// Validate an artifact against the extractor's feature set
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, PhishError> {
        if artifact.feature_names.is_empty() {
            return Err(PhishError::Model("artifact lists no features".into()));
        }

        let columns = artifact
            .feature_names
            .iter()
            .map(|name| {
                crate::FEATURE_NAMES
                    .iter()
                    .position(|n| *n == name.as_str())
                    .ok_or_else(|| PhishError::Model(format!("unknown feature '{}'", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(&idx) = artifact
            .tree
            .features()
            .iter()
            .find(|&&idx| idx >= columns.len())
        {
            return Err(PhishError::Model(format!(
                "tree splits on column {} but only {} features are declared",
                idx,
                columns.len()
            )));
        }

        Ok(Self { artifact, columns })
    }

    /// Load model from path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhishError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&content)
            .map_err(|e| PhishError::Model(format!("{}: {}", path.display(), e)))?;
        let classifier = Self::from_artifact(artifact)?;
        tracing::info!(
            path = %path.display(),
            features = classifier.columns.len(),
            version = classifier.artifact.version.as_deref().unwrap_or("unversioned"),
            "Loaded phishing model"
        );
        Ok(classifier)
    }

    /// Save model to path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PhishError> {
        let content = serde_json::to_string_pretty(&self.artifact)
            .map_err(|e| PhishError::Model(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Column order the model expects
    pub fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    /// Artifact version tag
    pub fn version(&self) -> Option<&str> {
        self.artifact.version.as_deref()
    }

    /// Predict
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, PhishError> {
        let values = features.values();
        let row = self
            .columns
            .iter()
            .map(|&i| {
                values.get(i).map(|&v| v as f64).ok_or_else(|| {
                    PhishError::Inference(format!("feature vector has no column {}", i))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let record = Array2::from_shape_vec((1, row.len()), row)
            .map_err(|e| PhishError::Inference(e.to_string()))?;
        let labels = self.artifact.tree.predict(&record);
        let label = labels
            .iter()
            .next()
            .copied()
            .ok_or_else(|| PhishError::Inference("model returned no label".into()))?;

        Ok(Prediction {
            label,
            verdict: Verdict::from_label(label)?,
        })
    }
}

/// Raw model output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Class label as emitted by the tree
    pub label: usize,
    /// Interpreted verdict
    pub verdict: Verdict,
}

/// Classification verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Not phishing
    Legitimate,
    /// Phishing
    Phishing,
}

impl Verdict {
    /// Map a tree label to a verdict
    pub fn from_label(label: usize) -> Result<Self, PhishError> {
        match label {
            LABEL_LEGITIMATE => Ok(Verdict::Legitimate),
            LABEL_PHISHING => Ok(Verdict::Phishing),
            other => Err(PhishError::Inference(format!("unknown label {}", other))),
        }
    }

    /// Tree label for this verdict
    pub fn label(&self) -> usize {
        match self {
            Verdict::Legitimate => LABEL_LEGITIMATE,
            Verdict::Phishing => LABEL_PHISHING,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Legitimate => "legitimate",
            Verdict::Phishing => "phishing",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fit a small tree on labelled URLs; for tests and fixtures only
#[cfg(test)]
pub(crate) fn fit_tree(samples: &[(&str, Verdict)]) -> DecisionTree<f64, usize> {
    use linfa::prelude::*;
    use ndarray::Array1;

    let mut data = Vec::with_capacity(samples.len() * crate::FEATURE_COUNT);
    for (url, _) in samples {
        data.extend(crate::extract_features(url).to_vector());
    }
    let records = Array2::from_shape_vec((samples.len(), crate::FEATURE_COUNT), data).unwrap();
    let targets: Array1<usize> = samples.iter().map(|(_, v)| v.label()).collect();
    let dataset = Dataset::new(records, targets);

    DecisionTree::params().max_depth(Some(4)).fit(&dataset).unwrap()
}

/// Classifier over the full extractor column order; for tests only
#[cfg(test)]
pub(crate) fn fit_fixture(samples: &[(&str, Verdict)]) -> UrlClassifier {
    let names = crate::FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    UrlClassifier::new(names, fit_tree(samples)).unwrap()
}

#[cfg(test)]
pub(crate) const FIXTURE_SAMPLES: &[(&str, Verdict)] = &[
    ("https://www.google.com/", Verdict::Legitimate),
    ("https://github.com/rust-lang/rust", Verdict::Legitimate),
    ("https://docs.rs/serde/latest/serde/", Verdict::Legitimate),
    ("https://en.wikipedia.org/wiki/Phishing", Verdict::Legitimate),
    ("http://paypal.com.secure-login.verify-account.ru/@signin/?id=a@b.c&redir=%2F%2Fx", Verdict::Phishing),
    ("http://192.168.0.1/~admin/login.php?user=x@y.z&next=a@b!c", Verdict::Phishing),
    ("http://bank-of-america.update-info.xyz/@@login/?acct=1@2@3", Verdict::Phishing),
    ("http://free-gift.win/@claim/?email=me@x.y&token=$$$", Verdict::Phishing),
];
