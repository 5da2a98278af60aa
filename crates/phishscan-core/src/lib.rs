//! phishscan-core: shared library for phishing URL detection.
//!
//! Provides URL feature extraction, feature alignment, ONNX inference,
//! batch checking, dataset evaluation and result reporting used by both the
//! CLI and GUI frontends.

pub mod config;
pub mod dataset;
pub mod detector;
pub mod domain;
pub mod error;
pub mod features;
pub mod inference;
pub mod ipv4;
pub mod layout;
pub mod report;
pub mod scan;
pub mod url_parts;

pub use config::{load_model_config, resolve_model_path, ModelConfig};
pub use detector::{load_detector, Detector, Outcome, Submission};
pub use error::{DetectError, Result};
pub use features::{extract_features, try_extract_features, FeatureVector};
pub use inference::{ClassScores, Classifier, OnnxClassifier};
pub use layout::{FeatureLayout, TRAINING_FEATURES};
pub use report::{CheckResult, Label, OutputFormat, Prediction};
