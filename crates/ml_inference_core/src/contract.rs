use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INPUT_BUCKET_ENV: &str = "INPUT_BUCKET";
pub const FILE_NAME_ENV: &str = "FILE_NAME";
pub const REGION_ENV: &str = "REGION";
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_JOB_COMMAND: &str = "batch_inference";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Location of an uploaded object that a job should classify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputReference {
    pub bucket: String,
    pub key: String,
}

impl InputReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, ValidationError> {
        let bucket = bucket.into().trim().to_string();
        // Keys may legally start or end with spaces; only blank keys are rejected.
        let key = key.into();

        if bucket.is_empty() {
            return Err(ValidationError::new("bucket name cannot be empty"));
        }
        if key.trim().is_empty() {
            return Err(ValidationError::new("object key cannot be empty"));
        }
        if key.ends_with('/') {
            return Err(ValidationError::new(format!(
                "object key '{key}' does not name a file"
            )));
        }

        Ok(Self { bucket, key })
    }

    /// Last `/`-separated segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectCreatedEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<ObjectCreatedRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectCreatedRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Object {
    pub key: String,
}

impl ObjectCreatedEvent {
    /// The last record of the notification wins when several arrive together.
    pub fn latest_input(&self) -> Result<InputReference, ValidationError> {
        let record = self
            .records
            .last()
            .ok_or_else(|| ValidationError::new("event contains no S3 records"))?;
        InputReference::new(record.s3.bucket.name.clone(), record.s3.object.key.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTarget {
    pub job_name: String,
    pub job_queue: String,
    pub job_definition: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentOverride {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSubmission {
    pub job_name: String,
    pub job_queue: String,
    pub job_definition: String,
    pub command: Vec<String>,
    pub environment: Vec<EnvironmentOverride>,
}

pub fn build_job_submission(
    target: &JobTarget,
    input: &InputReference,
    region: &str,
) -> JobSubmission {
    let environment = [
        (INPUT_BUCKET_ENV, input.bucket.as_str()),
        (FILE_NAME_ENV, input.key.as_str()),
        (REGION_ENV, region),
    ]
    .into_iter()
    .map(|(name, value)| EnvironmentOverride {
        name: name.to_string(),
        value: value.to_string(),
    })
    .collect();

    JobSubmission {
        job_name: target.job_name.clone(),
        job_queue: target.job_queue.clone(),
        job_definition: target.job_definition.clone(),
        command: vec![
            target.command.clone(),
            "--bucket-name".to_string(),
            input.bucket.clone(),
            "--file-name".to_string(),
            input.key.clone(),
            "--region".to_string(),
            region.to_string(),
        ],
        environment,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleRequest {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Value,
}

impl CustomResourceEvent {
    pub fn lifecycle(&self) -> Result<LifecycleRequest, ValidationError> {
        match self.request_type.as_str() {
            "Create" => Ok(LifecycleRequest::Create),
            "Update" => Ok(LifecycleRequest::Update),
            "Delete" => Ok(LifecycleRequest::Delete),
            other => Err(ValidationError::new(format!(
                "Invalid request type: {other}"
            ))),
        }
    }

    pub fn repository(&self) -> Result<&str, ValidationError> {
        self.resource_properties
            .get("Repository")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ValidationError::new("ResourceProperties.Repository is required"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomResourceResponse {
    #[serde(
        rename = "PhysicalResourceId",
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_resource_id: Option<String>,
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Registry image identifier; at least one of the fields is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRef {
    pub digest: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeRequest {
    pub content: String,
}
