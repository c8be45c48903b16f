use std::fs;
use std::path::{Path, PathBuf};

use super::block_on;

pub const DEFAULT_MODEL_URL: &str =
    "https://github.com/onnx/models/raw/main/validated/vision/classification/resnet/model/resnet50-v1-7.onnx";
pub const DEFAULT_LABELS_URL: &str = "http://data.mxnet.io/models/imagenet/synset.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub model_url: String,
    pub labels_url: String,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifacts {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
}

/// Resolves the model and label files, downloading whichever is not cached yet.
pub fn fetch_artifacts(source: &ModelSource) -> Result<ModelArtifacts, String> {
    fs::create_dir_all(&source.cache_dir).map_err(|error| {
        format!(
            "failed to create model cache directory '{}': {error}",
            source.cache_dir.display()
        )
    })?;

    Ok(ModelArtifacts {
        model_path: ensure_cached(&source.model_url, &source.cache_dir)?,
        labels_path: ensure_cached(&source.labels_url, &source.cache_dir)?,
    })
}

pub fn artifact_file_name(url: &str) -> Result<&str, String> {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| format!("cannot derive a file name from url '{url}'"))
}

fn ensure_cached(url: &str, cache_dir: &Path) -> Result<PathBuf, String> {
    let target = cache_dir.join(artifact_file_name(url)?);
    if target.is_file() {
        tracing::debug!(component = "model_source", event = "cache_hit", path = %target.display());
        return Ok(target);
    }

    tracing::info!(component = "model_source", event = "download_started", url = url);
    let bytes = download(url)?;

    let partial = target.with_extension("partial");
    fs::write(&partial, &bytes)
        .map_err(|error| format!("failed to write '{}': {error}", partial.display()))?;
    fs::rename(&partial, &target)
        .map_err(|error| format!("failed to move '{}' into place: {error}", target.display()))?;

    tracing::info!(
        component = "model_source",
        event = "download_completed",
        url = url,
        bytes = bytes.len(),
    );
    Ok(target)
}

fn download(url: &str) -> Result<Vec<u8>, String> {
    let url = url.to_string();
    block_on(async move {
        let response = reqwest::get(&url)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| format!("failed to download '{url}': {error}"))?;
        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|error| format!("failed to read body of '{url}': {error}"))
    })
}
