//! Text to feature-vector transform, replayed from an exported fitted
//! vectorizer.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::Deserialize;

use crate::error::ModelError;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector: `(column, value)` pairs sorted by column.
pub type Features = Vec<(usize, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk shape of `vectorizer.json`.
#[derive(Debug, Deserialize)]
pub struct VectorizerSpec {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

#[allow(clippy::unnecessary_wraps)]
fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// A validated, immutable bag-of-words / TF-IDF vectorizer.
#[derive(Debug)]
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    stop_words: HashSet<String>,
}

impl Vectorizer {
    /// Validate an exported spec.
    ///
    /// # Errors
    ///
    /// - [`ModelError::TokenPattern`] if the token pattern does not compile.
    /// - [`ModelError::Inconsistent`] if the vocabulary is empty, its column
    ///   indices are not exactly `0..n`, the IDF length differs from the
    ///   vocabulary size, or the n-gram range is invalid.
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self, ModelError> {
        let n_features = spec.vocabulary.len();
        if n_features == 0 {
            return Err(ModelError::Inconsistent("vocabulary is empty".to_string()));
        }

        let columns: HashSet<usize> = spec.vocabulary.values().copied().collect();
        if columns.len() != n_features || columns.iter().any(|&c| c >= n_features) {
            return Err(ModelError::Inconsistent(format!(
                "vocabulary columns must be exactly 0..{n_features}"
            )));
        }

        if let Some(idf) = &spec.idf {
            if idf.len() != n_features {
                return Err(ModelError::Inconsistent(format!(
                    "idf has {} weights but vocabulary has {n_features} terms",
                    idf.len()
                )));
            }
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::Inconsistent(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        Ok(Self {
            vocabulary: spec.vocabulary,
            idf: spec.idf,
            lowercase: spec.lowercase,
            token_pattern: Regex::new(&spec.token_pattern)?,
            ngram_range: spec.ngram_range,
            binary: spec.binary,
            sublinear_tf: spec.sublinear_tf,
            norm: spec.norm,
            stop_words: spec.stop_words.unwrap_or_default().into_iter().collect(),
        })
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transform one document into its sparse feature vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> Features {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&column) = self.vocabulary.get(&term) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: Features = counts
            .into_iter()
            .map(|(column, tf)| (column, self.weight(column, tf)))
            .collect();

        self.normalize(&mut features);
        features
    }

    fn weight(&self, column: usize, tf: f64) -> f64 {
        let tf = if self.binary {
            1.0
        } else if self.sublinear_tf {
            1.0 + tf.ln()
        } else {
            tf
        };
        match &self.idf {
            Some(idf) => tf * idf.get(column).copied().unwrap_or(1.0),
            None => tf,
        }
    }

    fn normalize(&self, features: &mut Features) {
        let denominator = match self.norm {
            Some(Norm::L1) => features.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Some(Norm::L2) => features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            None => return,
        };
        if denominator > 0.0 {
            for (_, value) in features.iter_mut() {
                *value /= denominator;
            }
        }
    }
}
