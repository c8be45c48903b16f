use aws_sdk_batch::types::{ContainerOverrides, KeyValuePair};
use ml_inference_core::contract::JobSubmission;

use super::block_on;

pub trait JobSubmitter {
    /// Submits the job and returns the scheduler's job id.
    fn submit_job(&self, submission: &JobSubmission) -> Result<String, String>;
}

pub struct BatchJobSubmitter {
    batch_client: aws_sdk_batch::Client,
}

impl BatchJobSubmitter {
    pub fn new(batch_client: aws_sdk_batch::Client) -> Self {
        Self { batch_client }
    }
}

impl JobSubmitter for BatchJobSubmitter {
    fn submit_job(&self, submission: &JobSubmission) -> Result<String, String> {
        let client = self.batch_client.clone();
        let environment = submission
            .environment
            .iter()
            .map(|entry| {
                KeyValuePair::builder()
                    .name(&entry.name)
                    .value(&entry.value)
                    .build()
            })
            .collect();
        let overrides = ContainerOverrides::builder()
            .set_command(Some(submission.command.clone()))
            .set_environment(Some(environment))
            .build();
        let job_name = submission.job_name.clone();
        let job_queue = submission.job_queue.clone();
        let job_definition = submission.job_definition.clone();

        block_on(async move {
            client
                .submit_job()
                .job_name(job_name)
                .job_queue(job_queue)
                .job_definition(job_definition)
                .container_overrides(overrides)
                .send()
                .await
                .map(|output| output.job_id().to_string())
                .map_err(|error| format!("failed to submit batch job: {error}"))
        })
    }
}
