//! Classifier abstraction and ONNX model inference via the `ort` crate.

use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;

use ndarray::Array2;
use ort::session::Session;
use ort::value::TensorRef;

use crate::config::ModelConfig;
use crate::error::{DetectError, Result};

/// Output of one classification: the predicted class index and the
/// probability of every class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores {
    pub label: usize,
    pub probabilities: Vec<f32>,
}

impl ClassScores {
    /// Scores whose label is the most probable class. Ties go to the lower class.
    pub fn from_probabilities(probabilities: Vec<f32>) -> Result<Self> {
        let label = probabilities
            .iter()
            .enumerate()
            .rev()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .ok_or_else(|| DetectError::Prediction("model returned no probabilities".into()))?;
        Ok(Self {
            label,
            probabilities,
        })
    }
}

/// A pretrained binary classifier over one aligned feature row.
///
/// Implementations are immutable after construction and shared read-only
/// between requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f32]) -> Result<ClassScores>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, row: &[f32]) -> Result<ClassScores> {
        (**self).predict(row)
    }
}

fn load_error(path: &Path, e: impl Display) -> DetectError {
    DetectError::ModelLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn prediction_error(e: impl Display) -> DetectError {
    DetectError::Prediction(e.to_string())
}

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    label_output: Option<String>,
    probability_output: String,
}

impl OnnxClassifier {
    /// Load an ONNX model from the given path.
    pub fn load(model_path: &Path, config: &ModelConfig) -> Result<Self> {
        if !model_path.is_file() {
            return Err(load_error(model_path, "file not found"));
        }

        let session = Session::builder()
            .map_err(|e| load_error(model_path, e))?
            .with_intra_threads(config.intra_threads.max(1))
            .map_err(|e| load_error(model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_error(model_path, e))?;

        tracing::info!(path = %model_path.display(), "model loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name: config.input_name.clone(),
            label_output: config.label_output.clone(),
            probability_output: config.probability_output.clone(),
        })
    }
}

impl Classifier for OnnxClassifier {
    /// Run inference on a single row, reshaped to `(1, n_features)`.
    fn predict(&self, row: &[f32]) -> Result<ClassScores> {
        let input = Array2::from_shape_vec((1, row.len()), row.to_vec()).map_err(prediction_error)?;
        let input_tensor = TensorRef::from_array_view(&input).map_err(prediction_error)?;

        // Running a session needs exclusive access.
        let mut session = self
            .session
            .lock()
            .map_err(|e| DetectError::Prediction(format!("lock error: {e}")))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(prediction_error)?;

        let probabilities: Vec<f32> = outputs
            .get(self.probability_output.as_str())
            .ok_or_else(|| {
                DetectError::Prediction(format!("missing output {:?}", self.probability_output))
            })?
            .try_extract_array::<f32>()
            .map_err(prediction_error)?
            .iter()
            .copied()
            .collect();

        let Some(label_output) = &self.label_output else {
            return ClassScores::from_probabilities(probabilities);
        };

        let label = outputs
            .get(label_output.as_str())
            .ok_or_else(|| DetectError::Prediction(format!("missing output {label_output:?}")))?
            .try_extract_array::<i64>()
            .map_err(prediction_error)?
            .iter()
            .next()
            .copied()
            .ok_or_else(|| DetectError::Prediction("model returned no label".into()))?;
        let label = usize::try_from(label)
            .map_err(|_| DetectError::Prediction(format!("negative class label {label}")))?;

        Ok(ClassScores {
            label,
            probabilities,
        })
    }
}
