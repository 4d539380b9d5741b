//! Exported linear and naive Bayes classifiers plus the label encoder.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::vectorizer::Features;

/// Sentiment of a single comment. Every comment maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map a decoded label string. Only the exact strings `"Positive"` and
    /// `"Negative"` are recognised; everything else is `Neutral`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Positive" => Self::Positive,
            "Negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk shape of `label_encoder.json`.
#[derive(Debug, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

/// On-disk shape of `model.json`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    Linear {
        classes: Vec<usize>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        classes: Vec<usize>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

/// A validated classifier. `predict` returns an encoded class, which is
/// always a valid index into the label encoder it was validated against.
#[derive(Debug)]
pub enum Classifier {
    Linear {
        classes: Vec<usize>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        classes: Vec<usize>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

impl Classifier {
    /// Check the exported weights against the vectorizer width and the
    /// number of encoded labels.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Inconsistent`] on any shape mismatch or an
    /// encoded class outside `0..n_labels`.
    pub fn from_spec(
        spec: ClassifierSpec,
        n_features: usize,
        n_labels: usize,
    ) -> Result<Self, ModelError> {
        match spec {
            ClassifierSpec::Linear {
                classes,
                coef,
                intercept,
            } => {
                check_classes(&classes, n_labels)?;
                let expected_rows = if classes.len() == 2 && coef.len() == 1 {
                    1
                } else {
                    classes.len()
                };
                if coef.len() != expected_rows || intercept.len() != expected_rows {
                    return Err(ModelError::Inconsistent(format!(
                        "linear model has {} classes but {} coef rows and {} intercepts",
                        classes.len(),
                        coef.len(),
                        intercept.len()
                    )));
                }
                check_rows("coef", &coef, n_features)?;
                Ok(Self::Linear {
                    classes,
                    coef,
                    intercept,
                })
            }
            ClassifierSpec::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                check_classes(&classes, n_labels)?;
                if class_log_prior.len() != classes.len()
                    || feature_log_prob.len() != classes.len()
                {
                    return Err(ModelError::Inconsistent(format!(
                        "naive Bayes model has {} classes but {} priors and {} likelihood rows",
                        classes.len(),
                        class_log_prior.len(),
                        feature_log_prob.len()
                    )));
                }
                check_rows("feature_log_prob", &feature_log_prob, n_features)?;
                Ok(Self::MultinomialNb {
                    classes,
                    class_log_prior,
                    feature_log_prob,
                })
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::MultinomialNb { .. } => "multinomial_nb",
        }
    }

    /// Predict the encoded class for a feature vector.
    #[must_use]
    pub fn predict(&self, features: &Features) -> usize {
        match self {
            Self::Linear {
                classes,
                coef,
                intercept,
            } => {
                if coef.len() == 1 && classes.len() == 2 {
                    let score = dot(&coef[0], features) + intercept[0];
                    return if score > 0.0 { classes[1] } else { classes[0] };
                }
                let scores = coef
                    .iter()
                    .zip(intercept)
                    .map(|(row, bias)| dot(row, features) + bias);
                classes[argmax(scores)]
            }
            Self::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                let scores = feature_log_prob
                    .iter()
                    .zip(class_log_prior)
                    .map(|(row, prior)| dot(row, features) + prior);
                classes[argmax(scores)]
            }
        }
    }
}

fn check_classes(classes: &[usize], n_labels: usize) -> Result<(), ModelError> {
    if classes.is_empty() {
        return Err(ModelError::Inconsistent("model has no classes".to_string()));
    }
    if let Some(bad) = classes.iter().find(|&&c| c >= n_labels) {
        return Err(ModelError::Inconsistent(format!(
            "model class {bad} is outside the label encoder's {n_labels} classes"
        )));
    }
    Ok(())
}

fn check_rows(name: &str, rows: &[Vec<f64>], n_features: usize) -> Result<(), ModelError> {
    match rows.iter().find(|row| row.len() != n_features) {
        Some(row) => Err(ModelError::Inconsistent(format!(
            "{name} row has {} weights but the vectorizer produces {n_features} features",
            row.len()
        ))),
        None => Ok(()),
    }
}

fn dot(row: &[f64], features: &Features) -> f64 {
    features
        .iter()
        .map(|&(column, value)| row.get(column).copied().unwrap_or(0.0) * value)
        .sum()
}

/// Index of the first maximum.
fn argmax(scores: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (index, score) in scores.enumerate() {
        if score > best_score {
            best = index;
            best_score = score;
        }
    }
    best
}
