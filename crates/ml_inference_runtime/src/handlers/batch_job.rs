//! One-shot batch job: fetch an uploaded image, classify it, store the result.
//!
//! Every step reports an explicit outcome into a [`JobReport`]. A failed fetch
//! stops the job before anything is uploaded; a failed classification still
//! uploads a header-only record so each input yields exactly one record. The
//! job never returns an error to its caller: the scheduler always sees a
//! completed run and the final `job_completed` log line carries the status.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use ml_inference_core::contract::InputReference;
use ml_inference_core::job_report::{
    FailureCategory, JobReport, JobStatus, JobStep, StepOutcome,
};
use ml_inference_core::record::{empty_output_record, render_output_record};
use ml_inference_core::storage_keys::{
    input_object_key, local_output_file_name, output_object_key,
};

use crate::adapters::classifier::ModelLoader;
use crate::adapters::object_store::ObjectStore;

/// Fetched inputs live in their own scratch subdirectory so an upload can never
/// shadow a cached model artifact.
pub const INPUT_SCRATCH_SUBDIR: &str = "input";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJobSettings {
    pub scratch_dir: PathBuf,
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("processing error: {0}")]
    Processing(String),
    #[error("upload error: {0}")]
    Upload(String),
}

impl StepError {
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Storage(_) => FailureCategory::Storage,
            Self::Processing(_) => FailureCategory::Processing,
            Self::Upload(_) => FailureCategory::Upload,
        }
    }

    fn into_outcome(self) -> StepOutcome {
        let category = self.category();
        let message = match self {
            Self::Storage(message) | Self::Processing(message) | Self::Upload(message) => message,
        };
        StepOutcome::Failed { category, message }
    }
}

pub fn handle_batch_job(
    input: &InputReference,
    settings: &BatchJobSettings,
    store: &impl ObjectStore,
    loader: &impl ModelLoader,
    clock: impl Fn() -> DateTime<Utc>,
) -> JobReport {
    let started_at = Instant::now();
    let file_name = input.file_name();
    tracing::info!(
        component = "batch_job",
        event = "job_started",
        file = file_name,
        bucket = %input.bucket,
        key = %input.key,
    );

    let mut report = JobReport::new(input.clone());

    let local_input = match fetch_input(input, settings, store) {
        Ok(path) => {
            report.record(JobStep::Fetch, StepOutcome::Succeeded);
            path
        }
        Err(error) => {
            log_step_failure(file_name, JobStep::Fetch, &error);
            report.record(JobStep::Fetch, error.into_outcome());
            for step in [JobStep::Classify, JobStep::Store] {
                report.record(
                    step,
                    StepOutcome::Skipped {
                        reason: "input was not fetched".to_string(),
                    },
                );
            }
            log_job_completed(&report, started_at);
            return report;
        }
    };

    let record = match classify_input(&local_input, file_name, settings.top_k, loader) {
        Ok(record) => {
            report.record(JobStep::Classify, StepOutcome::Succeeded);
            record
        }
        Err(error) => {
            log_step_failure(file_name, JobStep::Classify, &error);
            report.record(JobStep::Classify, error.into_outcome());
            empty_output_record()
        }
    };

    match store_output(&record, file_name, settings, store, &clock) {
        Ok(output_key) => {
            report.record(JobStep::Store, StepOutcome::Succeeded);
            report.output_key = Some(output_key);
        }
        Err(error) => {
            log_step_failure(file_name, JobStep::Store, &error);
            report.record(JobStep::Store, error.into_outcome());
        }
    }

    log_job_completed(&report, started_at);
    report
}

fn fetch_input(
    input: &InputReference,
    settings: &BatchJobSettings,
    store: &impl ObjectStore,
) -> Result<PathBuf, StepError> {
    let key = input_object_key(input.file_name());
    let body = store
        .read_object(&key)
        .map_err(|error| StepError::Storage(format!("Error retrieving file from S3: {error}")))?;

    let input_dir = settings.scratch_dir.join(INPUT_SCRATCH_SUBDIR);
    fs::create_dir_all(&input_dir).map_err(|error| {
        StepError::Storage(format!(
            "failed to create scratch directory '{}': {error}",
            input_dir.display()
        ))
    })?;
    let local_path = input_dir.join(input.file_name());
    fs::write(&local_path, &body).map_err(|error| {
        StepError::Storage(format!(
            "failed to write scratch file '{}': {error}",
            local_path.display()
        ))
    })?;

    tracing::debug!(
        component = "batch_job",
        event = "input_fetched",
        file = input.file_name(),
        key = %key,
        bytes = body.len(),
    );
    Ok(local_path)
}

fn classify_input(
    local_input: &Path,
    file_name: &str,
    top_k: usize,
    loader: &impl ModelLoader,
) -> Result<String, StepError> {
    let image = fs::read(local_input).map_err(|error| {
        StepError::Processing(format!(
            "failed to read scratch file '{}': {error}",
            local_input.display()
        ))
    })?;

    let classifier = loader
        .load()
        .map_err(|error| StepError::Processing(format!("failed to load model: {error}")))?;
    let predictions = classifier
        .classify(&image, top_k)
        .map_err(|error| StepError::Processing(format!("Error processing file {error}")))?;

    let record = render_output_record(file_name, &predictions)
        .map_err(|error| StepError::Processing(error.to_string()))?;
    tracing::debug!(
        component = "batch_job",
        event = "inference_completed",
        file = file_name,
        record = %record,
    );
    Ok(record)
}

fn store_output(
    record: &str,
    file_name: &str,
    settings: &BatchJobSettings,
    store: &impl ObjectStore,
    clock: &impl Fn() -> DateTime<Utc>,
) -> Result<String, StepError> {
    let local_path = settings.scratch_dir.join(local_output_file_name(file_name));
    fs::write(&local_path, record).map_err(|error| {
        StepError::Upload(format!(
            "failed to write '{}': {error}",
            local_path.display()
        ))
    })?;

    let output_key = output_object_key(clock(), file_name);
    store
        .write_object(&output_key, record.as_bytes())
        .map_err(|error| StepError::Upload(format!("Can't upload to S3: {error}")))?;

    tracing::info!(
        component = "batch_job",
        event = "output_stored",
        file = file_name,
        output_key = %output_key,
    );
    Ok(output_key)
}

fn log_step_failure(file_name: &str, step: JobStep, error: &StepError) {
    tracing::error!(
        component = "batch_job",
        event = "step_failed",
        file = file_name,
        step = step.as_str(),
        category = ?error.category(),
        error = %error,
    );
}

fn log_job_completed(report: &JobReport, started_at: Instant) {
    let steps = serde_json::to_string(&report.steps).unwrap_or_default();
    let duration_ms = started_at.elapsed().as_millis() as u64;
    let file = report.input.file_name();
    let output_key = report.output_key.as_deref().unwrap_or("");

    match report.status() {
        JobStatus::Succeeded => tracing::info!(
            component = "batch_job",
            event = "job_completed",
            file = file,
            status = "succeeded",
            output_key = output_key,
            duration_ms = duration_ms,
            steps = %steps,
        ),
        JobStatus::Degraded => tracing::warn!(
            component = "batch_job",
            event = "job_completed",
            file = file,
            status = "degraded",
            output_key = output_key,
            duration_ms = duration_ms,
            steps = %steps,
        ),
        JobStatus::Failed => tracing::error!(
            component = "batch_job",
            event = "job_completed",
            file = file,
            status = "failed",
            duration_ms = duration_ms,
            steps = %steps,
        ),
    }
}
