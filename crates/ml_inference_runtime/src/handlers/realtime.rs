use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ml_inference_core::contract::RealtimeRequest;
use ml_inference_core::record::describe_predictions;
use serde_json::Value;

use crate::adapters::classifier::ImageClassifier;

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    #[error("content is not valid base64: {0}")]
    InvalidContent(#[from] base64::DecodeError),
    #[error("{0}")]
    Classification(String),
}

/// Classifies the base64 image in `content` with an already loaded model.
pub fn handle_realtime_request(
    event: Value,
    classifier: &dyn ImageClassifier,
    top_k: usize,
) -> Result<String, RealtimeError> {
    let request: RealtimeRequest = serde_json::from_value(event)?;
    let image = STANDARD.decode(request.content.trim())?;

    let predictions = classifier
        .classify(&image, top_k)
        .map_err(RealtimeError::Classification)?;
    let description = describe_predictions(&predictions);

    tracing::info!(
        component = "realtime",
        event = "inference_completed",
        bytes = image.len(),
        predictions = predictions.len(),
        result = %description,
    );
    Ok(description)
}
