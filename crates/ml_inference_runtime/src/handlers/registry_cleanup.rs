//! Custom resource that empties the model image repository when the stack is
//! deleted, so the repository itself can be removed.

use ml_inference_core::contract::{
    CustomResourceEvent, CustomResourceResponse, LifecycleRequest, ValidationError,
};
use serde_json::Value;

use crate::adapters::image_registry::{delete_all_images, list_all_images, ImageRegistry};

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("malformed custom resource event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub fn handle_custom_resource_event(
    event: Value,
    registry: &impl ImageRegistry,
) -> Result<CustomResourceResponse, CleanupError> {
    let event: CustomResourceEvent = serde_json::from_value(event)?;
    let lifecycle = event.lifecycle()?;
    tracing::info!(
        component = "registry_cleanup",
        event = "request_received",
        request_type = %event.request_type,
        properties = %event.resource_properties,
    );

    match lifecycle {
        LifecycleRequest::Create => Ok(CustomResourceResponse {
            physical_resource_id: Some(event.repository()?.to_string()),
            data: None,
        }),
        LifecycleRequest::Update => Ok(CustomResourceResponse {
            physical_resource_id: event.physical_resource_id.clone(),
            data: None,
        }),
        LifecycleRequest::Delete => {
            match event.repository() {
                Ok(repository) => empty_repository(repository, registry),
                Err(error) => tracing::error!(
                    component = "registry_cleanup",
                    event = "cleanup_skipped",
                    error = %error,
                ),
            }
            Ok(CustomResourceResponse {
                physical_resource_id: event.physical_resource_id.clone(),
                data: None,
            })
        }
    }
}

// Failures are logged only; a stuck delete would block stack removal.
fn empty_repository(repository: &str, registry: &impl ImageRegistry) {
    let images = match list_all_images(registry, repository) {
        Ok(images) => images,
        Err(error) => {
            tracing::error!(
                component = "registry_cleanup",
                event = "list_failed",
                repository = repository,
                error = %error,
            );
            return;
        }
    };

    if images.is_empty() {
        tracing::info!(
            component = "registry_cleanup",
            event = "repository_empty",
            repository = repository,
        );
        return;
    }

    match delete_all_images(registry, repository, &images) {
        Ok(deleted) => tracing::info!(
            component = "registry_cleanup",
            event = "images_deleted",
            repository = repository,
            listed = images.len(),
            deleted = deleted,
        ),
        Err(error) => tracing::error!(
            component = "registry_cleanup",
            event = "delete_failed",
            repository = repository,
            error = %error,
        ),
    }
}
