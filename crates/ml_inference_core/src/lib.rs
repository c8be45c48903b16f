//! Shared domain primitives for the serverless image-classification pipeline.
//!
//! This crate owns the deterministic parts of the system: event and job
//! contracts, storage key layout, the output record format, image
//! preprocessing and top-k ranking. It intentionally excludes AWS SDK, ONNX
//! Runtime and Lambda runtime concerns.

pub mod contract;
pub mod job_report;
pub mod preprocess;
pub mod ranking;
pub mod record;
pub mod storage_keys;
