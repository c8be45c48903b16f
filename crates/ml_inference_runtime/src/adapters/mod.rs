use std::future::Future;

pub mod classifier;
pub mod image_registry;
pub mod job_queue;
pub mod model_source;
pub mod object_store;
pub mod onnx;

/// Drives an SDK future from the synchronous adapter traits. Must be called
/// from inside a multi-threaded Tokio runtime.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
