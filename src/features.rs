//! Feature Extraction
//!
//! Lexical features of a URL, laid out in the column order the classifier
//! was trained on. Every feature is a non-negative integer count or length.

use crate::url::DecomposedUrl;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::AddAssign;

/// Counters computed per namespace
pub const COUNTER_COUNT: usize = 17;

/// Characters counted in every namespace, with their feature-name fragment
pub const COUNTED_CHARS: [(&str, char); COUNTER_COUNT] = [
    ("dot", '.'),
    ("hyphen", '-'),
    ("underline", '_'),
    ("slash", '/'),
    ("questionmark", '?'),
    ("equal", '='),
    ("at", '@'),
    ("and", '&'),
    ("exclamation", '!'),
    ("space", ' '),
    ("tilde", '~'),
    ("comma", ','),
    ("plus", '+'),
    ("asterisk", '*'),
    ("hashtag", '#'),
    ("dollar", '$'),
    ("percent", '%'),
];

/// Number of features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 92;

/// Feature names in model column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // url
    "qty_dot_url",
    "qty_hyphen_url",
    "qty_underline_url",
    "qty_slash_url",
    "qty_questionmark_url",
    "qty_equal_url",
    "qty_at_url",
    "qty_and_url",
    "qty_exclamation_url",
    "qty_space_url",
    "qty_tilde_url",
    "qty_comma_url",
    "qty_plus_url",
    "qty_asterisk_url",
    "qty_hashtag_url",
    "qty_dollar_url",
    "qty_percent_url",
    "qty_tld_url",
    "length_url",
    // domain
    "qty_dot_domain",
    "qty_hyphen_domain",
    "qty_underline_domain",
    "qty_slash_domain",
    "qty_questionmark_domain",
    "qty_equal_domain",
    "qty_at_domain",
    "qty_and_domain",
    "qty_exclamation_domain",
    "qty_space_domain",
    "qty_tilde_domain",
    "qty_comma_domain",
    "qty_plus_domain",
    "qty_asterisk_domain",
    "qty_hashtag_domain",
    "qty_dollar_domain",
    "qty_percent_domain",
    "qty_vowels_domain",
    "domain_length",
    "server_client_domain",
    // directory
    "qty_dot_directory",
    "qty_hyphen_directory",
    "qty_underline_directory",
    "qty_slash_directory",
    "qty_questionmark_directory",
    "qty_equal_directory",
    "qty_at_directory",
    "qty_and_directory",
    "qty_exclamation_directory",
    "qty_space_directory",
    "qty_tilde_directory",
    "qty_comma_directory",
    "qty_plus_directory",
    "qty_asterisk_directory",
    "qty_hashtag_directory",
    "qty_dollar_directory",
    "qty_percent_directory",
    "directory_length",
    // file
    "qty_dot_file",
    "qty_hyphen_file",
    "qty_underline_file",
    "qty_slash_file",
    "qty_questionmark_file",
    "qty_equal_file",
    "qty_at_file",
    "qty_and_file",
    "qty_exclamation_file",
    "qty_space_file",
    "qty_tilde_file",
    "qty_comma_file",
    "qty_plus_file",
    "qty_asterisk_file",
    "qty_hashtag_file",
    "qty_dollar_file",
    "qty_percent_file",
    "file_length",
    // params
    "qty_dot_params",
    "qty_hyphen_params",
    "qty_underline_params",
    "qty_slash_params",
    "qty_questionmark_params",
    "qty_equal_params",
    "qty_at_params",
    "qty_and_params",
    "qty_exclamation_params",
    "qty_space_params",
    "qty_tilde_params",
    "qty_comma_params",
    "qty_plus_params",
    "qty_asterisk_params",
    "qty_hashtag_params",
    "qty_dollar_params",
    "qty_percent_params",
];

/// Substring context the shared counters run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// The raw input
    Url,
    /// The host
    Domain,
    /// `/` followed by the joined path segments
    Directory,
    /// The last path segment
    File,
    /// Every query value, summed
    Params,
}

impl Namespace {
    /// All namespaces in column order
    pub const ALL: [Namespace; 5] = [
        Namespace::Url,
        Namespace::Domain,
        Namespace::Directory,
        Namespace::File,
        Namespace::Params,
    ];

    /// Feature-name suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Url => "url",
            Namespace::Domain => "domain",
            Namespace::Directory => "directory",
            Namespace::File => "file",
            Namespace::Params => "params",
        }
    }
}

/// Occurrences of each of the [`COUNTED_CHARS`] in a string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCounts([u64; COUNTER_COUNT]);

impl CharCounts {
    /// Count the tracked characters in `s`
    pub fn of(s: &str) -> Self {
        let mut counts = [0u64; COUNTER_COUNT];
        for c in s.chars() {
            if let Some(i) = COUNTED_CHARS.iter().position(|&(_, t)| t == c) {
                counts[i] += 1;
            }
        }
        Self(counts)
    }
}

impl AddAssign for CharCounts {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<'a> std::iter::Sum<&'a str> for CharCounts {
    fn sum<I: Iterator<Item = &'a str>>(iter: I) -> Self {
        let mut total = CharCounts::default();
        for s in iter {
            total += CharCounts::of(s);
        }
        total
    }
}

/// Complete, ordered feature record for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: [u64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Extract features from a raw URL
    pub fn from_url(url: &str) -> Self {
        let parts = DecomposedUrl::parse(url);
        let host = parts.host.as_str();
        let directory = parts.directory();
        let filename = parts.filename();

        let mut w = FeatureWriter::default();

        w.push_counts(Namespace::Url, CharCounts::of(url));
        w.push("qty_tld_url", tld_length(host));
        w.push("length_url", char_len(url));

        w.push_counts(Namespace::Domain, CharCounts::of(host));
        w.push("qty_vowels_domain", count_vowels(host));
        w.push("domain_length", char_len(host));
        w.push("server_client_domain", server_client(host, url));

        w.push_counts(Namespace::Directory, CharCounts::of(&directory));
        w.push("directory_length", parts.path_segments.len() as u64);

        w.push_counts(Namespace::File, CharCounts::of(filename));
        w.push("file_length", char_len(filename));

        let params: CharCounts = parts.query_params.values().map(String::as_str).sum();
        w.push_counts(Namespace::Params, params);

        w.finish()
    }

    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<u64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    /// `(name, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    /// Raw values in column order
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Convert to feature vector
    pub fn to_vector(&self) -> Vec<f64> {
        self.values.iter().map(|&v| v as f64).collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Extract the full feature record of a raw URL
pub fn extract_features(url: &str) -> FeatureVector {
    FeatureVector::from_url(url)
}

/// Fills a [`FeatureVector`] column by column
#[derive(Default)]
struct FeatureWriter {
    values: Vec<u64>,
}

impl FeatureWriter {
    fn push(&mut self, name: &str, value: u64) {
        debug_assert_eq!(FEATURE_NAMES[self.values.len()], name);
        self.values.push(value);
    }

    fn push_counts(&mut self, ns: Namespace, counts: CharCounts) {
        for (&(label, _), value) in COUNTED_CHARS.iter().zip(counts.0) {
            debug_assert_eq!(
                FEATURE_NAMES[self.values.len()],
                format!("qty_{}_{}", label, ns.as_str())
            );
            self.values.push(value);
        }
    }

    fn finish(self) -> FeatureVector {
        let mut values = [0u64; FEATURE_COUNT];
        debug_assert_eq!(self.values.len(), FEATURE_COUNT);
        for (slot, v) in values.iter_mut().zip(self.values) {
            *slot = v;
        }
        FeatureVector { values }
    }
}

// Helper functions
fn char_len(s: &str) -> u64 {
    s.chars().count() as u64
}

fn tld_length(host: &str) -> u64 {
    host.rsplit_once('.').map(|(_, tld)| char_len(tld)).unwrap_or(0)
}

fn count_vowels(s: &str) -> u64 {
    s.chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count() as u64
}

fn server_client(host: &str, url: &str) -> u64 {
    if !host.is_empty() && url.to_lowercase().contains(&host.to_lowercase()) {
        1
    } else {
        0
    }
}
