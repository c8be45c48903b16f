use lambda_runtime::{service_fn, Error, LambdaEvent};
use ml_inference_core::contract::CustomResourceResponse;
use ml_inference_runtime::adapters::image_registry::EcrImageRegistry;
use ml_inference_runtime::handlers::registry_cleanup::handle_custom_resource_event;
use ml_inference_runtime::telemetry::init_tracing_from_env;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    registry: &EcrImageRegistry,
) -> Result<CustomResourceResponse, Error> {
    handle_custom_resource_event(event.payload, registry).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing_from_env().map_err(Error::from)?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let registry = EcrImageRegistry::new(aws_sdk_ecr::Client::new(&aws_config));

    let registry = &registry;
    lambda_runtime::run(service_fn(move |event| async move {
        handle_request(event, registry).await
    }))
    .await
}
