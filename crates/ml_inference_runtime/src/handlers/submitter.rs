use ml_inference_core::contract::{build_job_submission, ObjectCreatedEvent, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::job_queue::JobSubmitter;
use crate::config::SubmitterConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitterResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitterError {
    #[error("malformed S3 event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    #[error("invalid S3 event: {0}")]
    InvalidEvent(#[from] ValidationError),
    #[error("{0}")]
    Submission(String),
}

/// Submits one batch job for the newest object in an S3 notification.
pub fn handle_object_created_event(
    event: Value,
    config: &SubmitterConfig,
    region: &str,
    submitter: &dyn JobSubmitter,
) -> Result<SubmitterResponse, SubmitterError> {
    let body = format!("Input Received - {event}");
    let notification: ObjectCreatedEvent = serde_json::from_value(event)?;
    let input = notification.latest_input()?;

    tracing::info!(
        component = "job_submitter",
        event = "input_received",
        bucket = %input.bucket,
        key = %input.key,
        region = region,
        records = notification.records.len(),
    );

    let submission = build_job_submission(&config.target, &input, region);
    let job_id = submitter
        .submit_job(&submission)
        .map_err(SubmitterError::Submission)?;

    tracing::info!(
        component = "job_submitter",
        event = "job_submitted",
        job_id = %job_id,
        job_name = %submission.job_name,
        job_queue = %submission.job_queue,
    );

    Ok(SubmitterResponse {
        status_code: 200,
        body,
        job_id,
    })
}
