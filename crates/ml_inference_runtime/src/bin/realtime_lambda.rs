use lambda_runtime::{service_fn, Error, LambdaEvent};
use ml_inference_core::contract::DEFAULT_TOP_K;
use ml_inference_runtime::adapters::model_source::fetch_artifacts;
use ml_inference_runtime::adapters::onnx::OnnxImageClassifier;
use ml_inference_runtime::config::model_source_from_lookup;
use ml_inference_runtime::handlers::realtime::handle_realtime_request;
use ml_inference_runtime::telemetry::init_tracing_from_env;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    classifier: &OnnxImageClassifier,
) -> Result<String, Error> {
    handle_realtime_request(event.payload, classifier, DEFAULT_TOP_K).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing_from_env().map_err(Error::from)?;

    // Loaded once per execution environment and reused by every invocation.
    let source = model_source_from_lookup(|name| std::env::var(name).ok());
    let artifacts = fetch_artifacts(&source).map_err(Error::from)?;
    let classifier = OnnxImageClassifier::load(&artifacts.model_path, &artifacts.labels_path)
        .map_err(Error::from)?;

    let classifier = &classifier;
    lambda_runtime::run(service_fn(move |event| async move {
        handle_request(event, classifier).await
    }))
    .await
}
