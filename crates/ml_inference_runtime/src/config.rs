use std::path::{Path, PathBuf};

use clap::Parser;
use ml_inference_core::contract::{
    InputReference, JobTarget, ValidationError, DEFAULT_JOB_COMMAND, DEFAULT_TOP_K,
    FILE_NAME_ENV, INPUT_BUCKET_ENV, REGION_ENV,
};

use crate::adapters::model_source::{ModelSource, DEFAULT_LABELS_URL, DEFAULT_MODEL_URL};
use crate::handlers::batch_job::BatchJobSettings;

pub const JOB_NAME_ENV: &str = "JOB_NAME";
pub const JOB_QUEUE_ENV: &str = "JOB_QUEUE";
pub const JOB_DEFINITION_ENV: &str = "JOB_DEFINITION";
pub const JOB_COMMAND_ENV: &str = "JOB_COMMAND";
pub const MODEL_URL_ENV: &str = "MODEL_URL";
pub const LABELS_URL_ENV: &str = "LABELS_URL";
pub const MODEL_CACHE_DIR_ENV: &str = "MODEL_CACHE_DIR";
pub const SCRATCH_DIR_ENV: &str = "SCRATCH_DIR";
pub const DEBUG_ENV: &str = "DEBUG";
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";
/// Default model cache location, relative to the scratch directory.
pub const MODEL_CACHE_SUBDIR: &str = "model";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("invalid job input: {0}")]
    Input(#[from] ValidationError),
}

/// Command line of the batch container; every flag falls back to its
/// environment variable, which is how the job submitter passes them.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batch_inference",
    about = "Classify one uploaded image and store the top-5 result next to it"
)]
pub struct BatchJobArgs {
    /// Bucket holding `input/<file>`; results go to `output/` in the same bucket
    #[arg(long, env = INPUT_BUCKET_ENV)]
    pub bucket_name: String,
    /// Object key or bare file name of the uploaded image
    #[arg(long, env = FILE_NAME_ENV)]
    pub file_name: String,
    /// AWS region; defaults to the SDK provider chain
    #[arg(long, env = REGION_ENV)]
    pub region: Option<String>,
    #[arg(long, env = SCRATCH_DIR_ENV, default_value = DEFAULT_SCRATCH_DIR)]
    pub scratch_dir: PathBuf,
    #[arg(long, env = MODEL_URL_ENV, default_value = DEFAULT_MODEL_URL)]
    pub model_url: String,
    #[arg(long, env = LABELS_URL_ENV, default_value = DEFAULT_LABELS_URL)]
    pub labels_url: String,
    /// Where downloaded model files are kept; defaults to `<scratch-dir>/model`
    #[arg(long, env = MODEL_CACHE_DIR_ENV)]
    pub model_cache_dir: Option<PathBuf>,
    /// `LOGTYPE` enables debug logging
    #[arg(long, env = DEBUG_ENV)]
    pub debug: Option<String>,
}

impl BatchJobArgs {
    pub fn input(&self) -> Result<InputReference, ConfigError> {
        Ok(InputReference::new(&self.bucket_name, &self.file_name)?)
    }

    pub fn model_source(&self) -> ModelSource {
        ModelSource {
            model_url: self.model_url.clone(),
            labels_url: self.labels_url.clone(),
            cache_dir: self
                .model_cache_dir
                .clone()
                .unwrap_or_else(|| self.scratch_dir.join(MODEL_CACHE_SUBDIR)),
        }
    }

    pub fn settings(&self) -> BatchJobSettings {
        BatchJobSettings {
            scratch_dir: self.scratch_dir.clone(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterConfig {
    pub target: JobTarget,
}

impl SubmitterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            target: JobTarget {
                job_name: required(JOB_NAME_ENV)?,
                job_queue: required(JOB_QUEUE_ENV)?,
                job_definition: required(JOB_DEFINITION_ENV)?,
                command: lookup(JOB_COMMAND_ENV)
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_JOB_COMMAND.to_string()),
            },
        })
    }
}

/// Model location for the long-lived real-time function.
pub fn model_source_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ModelSource {
    ModelSource {
        model_url: lookup(MODEL_URL_ENV).unwrap_or_else(|| DEFAULT_MODEL_URL.to_string()),
        labels_url: lookup(LABELS_URL_ENV).unwrap_or_else(|| DEFAULT_LABELS_URL.to_string()),
        cache_dir: lookup(MODEL_CACHE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(DEFAULT_SCRATCH_DIR).join(MODEL_CACHE_SUBDIR)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| values.get(name).cloned()
    }

    #[test]
    fn submitter_config_requires_job_name() {
        let error = SubmitterConfig::from_lookup(lookup_from(&[
            ("JOB_QUEUE", "queue"),
            ("JOB_DEFINITION", "definition"),
        ]))
        .expect_err("should fail");
        assert_eq!(error.to_string(), "JOB_NAME must be configured");
    }

    #[test]
    fn submitter_config_defaults_command() {
        let config = SubmitterConfig::from_lookup(lookup_from(&[
            ("JOB_NAME", "inference"),
            ("JOB_QUEUE", "queue"),
            ("JOB_DEFINITION", "definition"),
        ]))
        .expect("config should load");
        assert_eq!(config.target.command, DEFAULT_JOB_COMMAND);
    }

    #[test]
    fn batch_args_read_flags() {
        let args = BatchJobArgs::try_parse_from([
            "batch_inference",
            "--bucket-name",
            "b1",
            "--file-name",
            "input/cat.jpg",
            "--region",
            "us-east-1",
            "--scratch-dir",
            "/scratch",
        ])
        .expect("args should parse");

        let input = args.input().expect("input should validate");
        assert_eq!(input.file_name(), "cat.jpg");
        assert_eq!(
            args.model_source().cache_dir,
            PathBuf::from("/scratch/model")
        );
        assert_eq!(args.settings().top_k, 5);
    }

    #[test]
    fn batch_args_reject_blank_bucket() {
        let args = BatchJobArgs::try_parse_from([
            "batch_inference",
            "--bucket-name",
            " ",
            "--file-name",
            "cat.jpg",
        ])
        .expect("args should parse");
        assert!(matches!(args.input(), Err(ConfigError::Input(_))));
    }

    #[test]
    fn model_source_defaults_to_published_artifacts() {
        let source = model_source_from_lookup(lookup_from(&[]));
        assert_eq!(source.model_url, DEFAULT_MODEL_URL);
        assert_eq!(source.labels_url, DEFAULT_LABELS_URL);
        assert_eq!(source.cache_dir, PathBuf::from("/tmp/model"));
    }
}
