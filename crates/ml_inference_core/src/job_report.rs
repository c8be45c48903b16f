use serde::{Deserialize, Serialize};

use crate::contract::InputReference;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStep {
    Fetch,
    Classify,
    Store,
}

impl JobStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Classify => "classify",
            Self::Store => "store",
        }
    }
}

/// Where a step failure originated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Storage,
    Processing,
    Upload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed {
        category: FailureCategory,
        message: String,
    },
    Skipped {
        reason: String,
    },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Every step succeeded and a full record was uploaded.
    Succeeded,
    /// A record was uploaded but an earlier step failed.
    Degraded,
    /// No record was uploaded.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepReport {
    pub step: JobStep,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobReport {
    pub input: InputReference,
    pub steps: Vec<StepReport>,
    pub output_key: Option<String>,
}

impl JobReport {
    pub fn new(input: InputReference) -> Self {
        Self {
            input,
            steps: Vec::with_capacity(3),
            output_key: None,
        }
    }

    pub fn record(&mut self, step: JobStep, outcome: StepOutcome) {
        self.steps.push(StepReport { step, outcome });
    }

    pub fn outcome(&self, step: JobStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    pub fn status(&self) -> JobStatus {
        if self.output_key.is_none() {
            return JobStatus::Failed;
        }
        if self.steps.iter().all(|report| report.outcome.is_success()) {
            JobStatus::Succeeded
        } else {
            JobStatus::Degraded
        }
    }
}
