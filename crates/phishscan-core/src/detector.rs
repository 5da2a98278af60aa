//! The detector: feature alignment in front of a loaded classifier.

use std::fmt;
use std::path::Path;

use crate::config::ModelConfig;
use crate::error::{DetectError, Result};
use crate::features::{extract_features, FeatureVector};
use crate::inference::{Classifier, OnnxClassifier};
use crate::layout::FeatureLayout;
use crate::report::{Label, Prediction};

/// A loaded classifier and the column layout it was trained on.
///
/// Built once at startup and passed by reference (or behind an `Arc`) to
/// every request. Nothing in it changes after construction.
pub struct Detector<C> {
    classifier: C,
    layout: FeatureLayout,
}

/// Load the ONNX model at `model_path` with the layout named by `config`.
pub fn load_detector(model_path: &Path, config: &ModelConfig) -> Result<Detector<OnnxClassifier>> {
    let layout = config.layout()?;
    let classifier = OnnxClassifier::load(model_path, config)?;
    Ok(Detector::new(classifier, layout))
}

impl<C: Classifier> Detector<C> {
    pub fn new(classifier: C, layout: FeatureLayout) -> Self {
        Self { classifier, layout }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The classifier input row for `features`.
    pub fn align(&self, features: &FeatureVector) -> Vec<f32> {
        self.layout.align(features)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let missing = self.layout.missing(features);
        if !missing.is_empty() {
            tracing::debug!(
                missing = missing.len(),
                columns = self.layout.len(),
                "zero-filling features the extractor does not compute"
            );
        }
        let unused = self.layout.unused(features);
        if !unused.is_empty() {
            tracing::debug!(?unused, "dropping features the model was not trained on");
        }

        let row = self.align(features);
        let scores = self.classifier.predict(&row)?;

        let label = Label::from_index(scores.label).ok_or_else(|| {
            DetectError::Prediction(format!("unknown class index {}", scores.label))
        })?;
        let confidence = scores
            .probabilities
            .get(scores.label)
            .copied()
            .ok_or_else(|| {
                DetectError::Prediction(format!(
                    "no probability for class {} ({} returned)",
                    scores.label,
                    scores.probabilities.len()
                ))
            })?;

        Ok(Prediction { label, confidence })
    }

    /// Extract features from `url` and classify them.
    pub fn check(&self, url: &str) -> Result<Prediction> {
        let features = extract_features(url);
        if features.is_empty() {
            return Err(DetectError::Extraction(format!("could not parse {url:?}")));
        }
        self.predict(&features)
    }

    /// Handle one front-end submission. Never fails; every problem becomes
    /// a user-facing message.
    ///
    /// Surrounding whitespace only decides whether the input is empty; the
    /// features are computed from the input exactly as typed.
    pub fn submit(&self, input: &str) -> Outcome {
        self.submit_with_features(input).outcome
    }

    /// [`submit`](Self::submit), also returning the extracted features
    /// (empty when extraction failed or never ran).
    pub fn submit_with_features(&self, input: &str) -> Submission {
        if input.trim().is_empty() {
            return Submission {
                outcome: Outcome::Warning("Please enter a URL first.".into()),
                features: FeatureVector::default(),
            };
        }

        let features = extract_features(input);
        if features.is_empty() {
            return Submission {
                outcome: Outcome::Error("Failed to extract features. Please check the URL.".into()),
                features,
            };
        }

        let outcome = match self.predict(&features) {
            Ok(prediction) => Outcome::Verdict(prediction),
            Err(e @ DetectError::Prediction(_)) => Outcome::Error(capitalize(&e.to_string())),
            Err(e) => {
                tracing::error!(url = input, error = %e, "check failed");
                Outcome::Error(e.to_string())
            }
        };
        Submission { outcome, features }
    }
}

/// Outcome of a submission together with the features it was decided on.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub outcome: Outcome,
    pub features: FeatureVector,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What a front end shows after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Warning(String),
    Error(String),
    Verdict(Prediction),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Warning(msg) | Outcome::Error(msg) => f.write_str(msg),
            Outcome::Verdict(p) => write!(f, "{p}"),
        }
    }
}
