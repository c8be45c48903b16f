//! AWS-oriented adapters and handlers for the image-classification pipeline.
//!
//! This crate owns runtime integration details (Lambda handlers, the batch job
//! entry point, S3/Batch/ECR clients and ONNX Runtime inference) and builds on
//! the contract, storage key and record primitives of `ml_inference_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;
