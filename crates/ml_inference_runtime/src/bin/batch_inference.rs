use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use ml_inference_runtime::adapters::object_store::S3ObjectStore;
use ml_inference_runtime::adapters::onnx::OnnxModelLoader;
use ml_inference_runtime::config::BatchJobArgs;
use ml_inference_runtime::handlers::batch_job::handle_batch_job;
use ml_inference_runtime::telemetry::{debug_enabled, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = BatchJobArgs::parse();
    init_tracing(debug_enabled(args.debug.as_deref())).map_err(anyhow::Error::msg)?;

    let input = args.input().context("invalid batch job input")?;

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = args.region.clone() {
        loader = loader.region(aws_config::Region::new(region));
    }
    let aws_config = loader.load().await;

    let store = S3ObjectStore::new(input.bucket.clone(), aws_sdk_s3::Client::new(&aws_config));
    let model_loader = OnnxModelLoader::new(args.model_source());

    // Step failures end up in the `job_completed` log line; the exit status stays 0.
    let _report = handle_batch_job(&input, &args.settings(), &store, &model_loader, Utc::now);
    Ok(())
}
