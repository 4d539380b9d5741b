//! Pre-trained sentiment model, loaded once and shared read-only.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::classifier::{Classifier, ClassifierSpec, LabelEncoder, SentimentLabel};
use crate::error::ModelError;
use crate::vectorizer::{Vectorizer, VectorizerSpec};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const MODEL_FILE: &str = "model.json";

/// Vectorizer, classifier and label encoder bundled after cross-validation.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct SentimentModel {
    vectorizer: Vectorizer,
    classifier: Classifier,
    /// Decoded label per encoded class.
    labels: Vec<SentimentLabel>,
}

impl SentimentModel {
    /// Load the three JSON artifacts from `dir`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Io`] if a file cannot be read.
    /// - [`ModelError::Deserialize`] if a file is not the expected JSON shape.
    /// - [`ModelError::TokenPattern`] / [`ModelError::Inconsistent`] if the
    ///   artifacts do not fit together.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let vectorizer: VectorizerSpec = read_artifact(dir, VECTORIZER_FILE)?;
        let encoder: LabelEncoder = read_artifact(dir, LABEL_ENCODER_FILE)?;
        let classifier: ClassifierSpec = read_artifact(dir, MODEL_FILE)?;

        let model = Self::from_parts(vectorizer, encoder, classifier)?;
        tracing::info!(
            dir = %dir.display(),
            features = model.vectorizer.n_features(),
            classes = model.labels.len(),
            kind = model.classifier.kind(),
            "sentiment model loaded"
        );
        Ok(model)
    }

    /// Build a model from already-deserialized artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the vectorizer is invalid, the label encoder
    /// is empty, or the classifier shape does not match the other two.
    pub fn from_parts(
        vectorizer: VectorizerSpec,
        encoder: LabelEncoder,
        classifier: ClassifierSpec,
    ) -> Result<Self, ModelError> {
        if encoder.classes.is_empty() {
            return Err(ModelError::Inconsistent(
                "label encoder has no classes".to_string(),
            ));
        }

        let vectorizer = Vectorizer::from_spec(vectorizer)?;
        let classifier =
            Classifier::from_spec(classifier, vectorizer.n_features(), encoder.classes.len())?;
        let labels = encoder
            .classes
            .iter()
            .map(|label| SentimentLabel::from_label(label))
            .collect();

        Ok(Self {
            vectorizer,
            classifier,
            labels,
        })
    }

    /// Classify one comment. Deterministic for a given set of artifacts.
    #[must_use]
    pub fn classify(&self, comment: &str) -> SentimentLabel {
        let features = self.vectorizer.transform(comment);
        let encoded = self.classifier.predict(&features);
        self.labels
            .get(encoded)
            .copied()
            .unwrap_or(SentimentLabel::Neutral)
    }
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ModelError> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path).map_err(|source| ModelError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Deserialize {
        context: name.to_string(),
        source,
    })
}
