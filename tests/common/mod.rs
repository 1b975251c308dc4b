//! Shared fixtures for integration tests

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use phishguard::{extract_features, UrlClassifier, Verdict, FEATURE_COUNT, FEATURE_NAMES};

pub const SAMPLES: &[(&str, Verdict)] = &[
    ("https://www.rust-lang.org/learn", Verdict::Legitimate),
    ("https://crates.io/crates/axum", Verdict::Legitimate),
    ("https://news.ycombinator.com/", Verdict::Legitimate),
    ("https://example.com/index.html", Verdict::Legitimate),
    ("http://secure-paypal.account-verify.co/@login/?u=a@b.c", Verdict::Phishing),
    ("http://10.0.0.7/~x/signin.php?e=me@mail.ru&r=@", Verdict::Phishing),
    ("http://apple-id.unlock-now.top/@@/?id=1@1", Verdict::Phishing),
    ("http://win-prize.click/@/?mail=a@b&c=d@e", Verdict::Phishing),
];

pub fn fit_classifier() -> UrlClassifier {
    let mut data = Vec::with_capacity(SAMPLES.len() * FEATURE_COUNT);
    for (url, _) in SAMPLES {
        data.extend(extract_features(url).to_vector());
    }
    let records = Array2::from_shape_vec((SAMPLES.len(), FEATURE_COUNT), data).unwrap();
    let targets: Array1<usize> = SAMPLES.iter().map(|(_, v)| v.label()).collect();
    let dataset = Dataset::new(records, targets);

    let tree = DecisionTree::params().max_depth(Some(4)).fit(&dataset).unwrap();
    let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    UrlClassifier::new(names, tree).unwrap()
}
