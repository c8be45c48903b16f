use lambda_runtime::{service_fn, Error, LambdaEvent};
use ml_inference_runtime::adapters::job_queue::BatchJobSubmitter;
use ml_inference_runtime::config::SubmitterConfig;
use ml_inference_runtime::handlers::submitter::{handle_object_created_event, SubmitterResponse};
use ml_inference_runtime::telemetry::init_tracing_from_env;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &SubmitterConfig,
    region: &str,
    submitter: &BatchJobSubmitter,
) -> Result<SubmitterResponse, Error> {
    handle_object_created_event(event.payload, config, region, submitter).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing_from_env().map_err(Error::from)?;

    let config = SubmitterConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let region = aws_config
        .region()
        .map(ToString::to_string)
        .ok_or_else(|| Error::from("AWS region must be configured"))?;
    let submitter = BatchJobSubmitter::new(aws_sdk_batch::Client::new(&aws_config));

    let (config, region, submitter) = (&config, region.as_str(), &submitter);
    lambda_runtime::run(service_fn(move |event| async move {
        handle_request(event, config, region, submitter).await
    }))
    .await
}
