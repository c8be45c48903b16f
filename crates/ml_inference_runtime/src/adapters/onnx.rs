//! ONNX Runtime backed classifier.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use ml_inference_core::contract::Prediction;
use ml_inference_core::preprocess::prepare_input;
use ml_inference_core::ranking::{parse_labels, softmax, top_k};
use ort::logging::LogLevel;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use super::classifier::{ImageClassifier, ModelLoader};
use super::model_source::{fetch_artifacts, ModelSource};

pub struct OnnxImageClassifier {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    labels: Vec<String>,
}

impl OnnxImageClassifier {
    pub fn load(model_path: &Path, labels_path: &Path) -> Result<Self, String> {
        let labels_text = fs::read_to_string(labels_path).map_err(|error| {
            format!("failed to read labels '{}': {error}", labels_path.display())
        })?;
        let labels = parse_labels(&labels_text);
        if labels.is_empty() {
            return Err(format!(
                "label vocabulary '{}' is empty",
                labels_path.display()
            ));
        }

        let session = Session::builder()
            .and_then(|builder| builder.with_log_level(LogLevel::Error))
            .and_then(|builder| builder.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|error| {
                format!(
                    "failed to create ONNX session from '{}': {error}",
                    model_path.display()
                )
            })?;

        tracing::info!(
            component = "onnx_classifier",
            event = "model_loaded",
            model = %model_path.display(),
            labels = labels.len(),
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl ImageClassifier for OnnxImageClassifier {
    fn classify(&self, image: &[u8], top: usize) -> Result<Vec<Prediction>, String> {
        let tensor = prepare_input(image).map_err(|error| error.to_string())?;
        let dims: Vec<i64> = tensor.shape().iter().map(|&dim| dim as i64).collect();
        let data = tensor
            .as_slice()
            .ok_or_else(|| "input tensor is not contiguous in memory".to_string())?;
        let input = TensorRef::from_array_view((dims, data))
            .map_err(|error| format!("failed to build input tensor: {error}"))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| "ONNX session lock poisoned".to_string())?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|error| format!("forward pass failed: {error}"))?;
        let (_, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|error| format!("model output is not an f32 tensor: {error}"))?;

        if logits.len() != self.labels.len() {
            return Err(format!(
                "model produced {} scores but the vocabulary has {} labels",
                logits.len(),
                self.labels.len()
            ));
        }

        let probabilities = softmax(logits);
        Ok(top_k(&probabilities, &self.labels, top))
    }
}

/// Downloads (or reuses) the published artifacts and opens a session.
pub struct OnnxModelLoader {
    source: ModelSource,
}

impl OnnxModelLoader {
    pub fn new(source: ModelSource) -> Self {
        Self { source }
    }
}

impl ModelLoader for OnnxModelLoader {
    fn load(&self) -> Result<Box<dyn ImageClassifier>, String> {
        let artifacts = fetch_artifacts(&self.source)?;
        let classifier = OnnxImageClassifier::load(&artifacts.model_path, &artifacts.labels_path)?;
        Ok(Box::new(classifier))
    }
}
