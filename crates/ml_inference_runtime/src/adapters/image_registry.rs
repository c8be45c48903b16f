use aws_sdk_ecr::types::ImageIdentifier;
use ml_inference_core::contract::ImageRef;

use super::block_on;

/// ECR accepts at most this many image ids per `BatchDeleteImage` call.
pub const MAX_IMAGES_PER_DELETE: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePage {
    pub images: Vec<ImageRef>,
    pub next_token: Option<String>,
}

pub trait ImageRegistry {
    fn list_images_page(
        &self,
        repository: &str,
        next_token: Option<String>,
    ) -> Result<ImagePage, String>;
    /// Deletes one batch of at most [`MAX_IMAGES_PER_DELETE`] images and
    /// returns how many the registry removed.
    fn delete_image_batch(&self, repository: &str, images: &[ImageRef]) -> Result<usize, String>;
}

/// Splits images into batches the registry accepts in a single delete call.
pub fn delete_batches(images: &[ImageRef]) -> std::slice::Chunks<'_, ImageRef> {
    images.chunks(MAX_IMAGES_PER_DELETE)
}

/// Lists every image in the repository, following pagination tokens.
pub fn list_all_images(
    registry: &impl ImageRegistry,
    repository: &str,
) -> Result<Vec<ImageRef>, String> {
    let mut images = Vec::new();
    let mut next_token = None;
    loop {
        let page = registry.list_images_page(repository, next_token)?;
        images.extend(page.images);
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => return Ok(images),
        }
    }
}

/// Deletes all given images batch by batch; returns the total removed.
pub fn delete_all_images(
    registry: &impl ImageRegistry,
    repository: &str,
    images: &[ImageRef],
) -> Result<usize, String> {
    let mut deleted = 0;
    for batch in delete_batches(images) {
        deleted += registry.delete_image_batch(repository, batch)?;
    }
    Ok(deleted)
}

pub struct EcrImageRegistry {
    ecr_client: aws_sdk_ecr::Client,
}

impl EcrImageRegistry {
    pub fn new(ecr_client: aws_sdk_ecr::Client) -> Self {
        Self { ecr_client }
    }
}

impl ImageRegistry for EcrImageRegistry {
    fn list_images_page(
        &self,
        repository: &str,
        next_token: Option<String>,
    ) -> Result<ImagePage, String> {
        let client = self.ecr_client.clone();
        let repository = repository.to_string();

        block_on(async move {
            let output = client
                .list_images()
                .repository_name(&repository)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|error| {
                    format!("failed to list images in repository '{repository}': {error}")
                })?;

            Ok(ImagePage {
                images: output
                    .image_ids()
                    .iter()
                    .map(|id| ImageRef {
                        digest: id.image_digest().map(str::to_string),
                        tag: id.image_tag().map(str::to_string),
                    })
                    .collect(),
                next_token: output.next_token().map(str::to_string),
            })
        })
    }

    fn delete_image_batch(&self, repository: &str, images: &[ImageRef]) -> Result<usize, String> {
        let client = self.ecr_client.clone();
        let repository = repository.to_string();
        let identifiers: Vec<ImageIdentifier> = images
            .iter()
            .map(|image| {
                ImageIdentifier::builder()
                    .set_image_digest(image.digest.clone())
                    .set_image_tag(image.tag.clone())
                    .build()
            })
            .collect();

        block_on(async move {
            let output = client
                .batch_delete_image()
                .repository_name(&repository)
                .set_image_ids(Some(identifiers))
                .send()
                .await
                .map_err(|error| {
                    format!("failed to delete images in repository '{repository}': {error}")
                })?;

            for failure in output.failures() {
                tracing::warn!(
                    component = "image_registry",
                    event = "image_delete_failed",
                    repository = %repository,
                    reason = failure.failure_reason().unwrap_or_default(),
                );
            }
            Ok(output.image_ids().len())
        })
    }
}
