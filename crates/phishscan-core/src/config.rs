//! Model configuration sidecar.
//!
//! A model exported to ONNX usually ships with a small JSON file next to it:
//!
//! ```json
//! {
//!   "input_name": "input",
//!   "label_output": "label",
//!   "probability_output": "probabilities",
//!   "feature_names": ["length_url", "length_hostname", "..."]
//! }
//! ```
//!
//! Every field is optional. Without a sidecar the defaults match the shipped
//! model.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::FeatureLayout;

pub const DEFAULT_MODEL_PATH: &str = "models/xgb_phish.onnx";
pub const MODEL_PATH_ENV: &str = "PHISHSCAN_MODEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Name of the `(1, n_features)` float input tensor.
    pub input_name: String,
    /// Integer label output. When absent the label is the most probable class.
    pub label_output: Option<String>,
    /// `(1, n_classes)` float probability output.
    pub probability_output: String,
    pub intra_threads: usize,
    /// Column order the model was trained on. Defaults to the shipped layout.
    pub feature_names: Option<Vec<String>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_name: "input".into(),
            label_output: Some("label".into()),
            probability_output: "probabilities".into(),
            intra_threads: 4,
            feature_names: None,
        }
    }
}

impl ModelConfig {
    pub fn layout(&self) -> Result<FeatureLayout> {
        match &self.feature_names {
            Some(names) => FeatureLayout::from_names(names.iter().cloned()),
            None => Ok(FeatureLayout::training()),
        }
    }
}

pub fn load_model_config(path: &Path) -> Result<ModelConfig> {
    let data = fs::read_to_string(path)?;
    let config: ModelConfig = serde_json::from_str(&data)?;
    Ok(config)
}

/// Model path from an explicit value, then `PHISHSCAN_MODEL`, then the default.
pub fn resolve_model_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(MODEL_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_sidecar_uses_defaults() {
        let config: ModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.layout().unwrap(), FeatureLayout::training());
    }

    #[test]
    fn sidecar_overrides_names_and_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"input_name": "float_input", "label_output": null, "feature_names": ["ip", "nb_dots"]}}"#
        )
        .unwrap();

        let config = load_model_config(file.path()).unwrap();
        assert_eq!(config.input_name, "float_input");
        assert_eq!(config.label_output, None);
        assert_eq!(config.probability_output, "probabilities");
        assert_eq!(config.layout().unwrap().names(), ["ip", "nb_dots"]);
    }

    #[test]
    fn duplicate_feature_names_are_rejected() {
        let config = ModelConfig {
            feature_names: Some(vec!["ip".into(), "ip".into()]),
            ..ModelConfig::default()
        };
        assert!(config.layout().is_err());
    }

    #[test]
    fn malformed_sidecar_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_model_config(file.path()).is_err());
    }

    #[test]
    fn explicit_model_path_wins() {
        let path = resolve_model_path(Some(PathBuf::from("custom.onnx")));
        assert_eq!(path, PathBuf::from("custom.onnx"));
    }
}
