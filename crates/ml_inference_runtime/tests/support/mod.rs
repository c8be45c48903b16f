#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use image::{ImageFormat, Rgb, RgbImage};
use ml_inference_core::contract::Prediction;
use ml_inference_core::preprocess::prepare_input;
use ml_inference_core::ranking::{parse_labels, softmax, top_k};
use ml_inference_runtime::adapters::classifier::{ImageClassifier, ModelLoader};
use ml_inference_runtime::adapters::model_source::{fetch_artifacts, ModelSource};
use ml_inference_runtime::adapters::object_store::ObjectStore;

/// In-memory bucket that records every write and can refuse uploads.
#[derive(Default)]
pub struct RecordingStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    writes: Mutex<Vec<String>>,
    reject_writes: bool,
}

impl RecordingStore {
    pub fn with_object(key: &str, body: Vec<u8>) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body);
        store
    }

    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn written_keys(&self) -> Vec<String> {
        self.writes.lock().expect("poisoned mutex").clone()
    }

    pub fn object_text(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

impl ObjectStore for RecordingStore {
    fn read_object(&self, key: &str) -> Result<Vec<u8>, String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(key)
            .cloned()
            .ok_or_else(|| format!("NoSuchKey: {key}"))
    }

    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), String> {
        self.writes
            .lock()
            .expect("poisoned mutex")
            .push(key.to_string());
        if self.reject_writes {
            return Err(format!("AccessDenied: {key}"));
        }
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

/// Runs the real preprocessing and scores a small vocabulary from the mean
/// value of each input channel.
pub struct ChannelMeanClassifier {
    labels: Vec<String>,
}

impl ChannelMeanClassifier {
    pub fn with_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn new() -> Self {
        Self {
            labels: [
                "n01440764 tench",
                "n02123045 tabby, tabby cat",
                "n02123159 tiger cat",
                "n02124075 Egyptian cat",
                "n02127052 lynx, catamount",
                "n04254680 soccer ball",
                "n07747607 orange",
                "n09472597 volcano",
            ]
            .iter()
            .map(|label| label.to_string())
            .collect(),
        }
    }
}

impl ImageClassifier for ChannelMeanClassifier {
    fn classify(&self, image: &[u8], top: usize) -> Result<Vec<Prediction>, String> {
        let tensor = prepare_input(image).map_err(|error| error.to_string())?;
        let pixels = (tensor.shape()[2] * tensor.shape()[3]) as f32;
        let mut means = [0.0_f32; 3];
        for ((_, channel, _, _), value) in tensor.indexed_iter() {
            means[channel] += value / pixels;
        }

        let logits: Vec<f32> = (0..self.labels.len())
            .map(|index| means[index % 3] * (index as f32 + 1.0) / 4.0)
            .collect();
        Ok(top_k(&softmax(&logits), &self.labels, top))
    }
}

pub struct ChannelMeanLoader;

impl ModelLoader for ChannelMeanLoader {
    fn load(&self) -> Result<Box<dyn ImageClassifier>, String> {
        Ok(Box::new(ChannelMeanClassifier::new()))
    }
}

/// Resolves artifacts through the real cache lookup and reads the vocabulary
/// as text, the same way the ONNX loader does.
pub struct CachedVocabularyLoader {
    pub source: ModelSource,
}

impl ModelLoader for CachedVocabularyLoader {
    fn load(&self) -> Result<Box<dyn ImageClassifier>, String> {
        let artifacts = fetch_artifacts(&self.source)?;
        let text = fs::read_to_string(&artifacts.labels_path).map_err(|error| {
            format!(
                "failed to read labels '{}': {error}",
                artifacts.labels_path.display()
            )
        })?;
        Ok(Box::new(ChannelMeanClassifier::with_labels(parse_labels(
            &text,
        ))))
    }
}

pub struct UnavailableModelLoader;

impl ModelLoader for UnavailableModelLoader {
    fn load(&self) -> Result<Box<dyn ImageClassifier>, String> {
        Err("failed to download 'https://example.invalid/model.onnx'".to_string())
    }
}

pub fn png_bytes(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(pixel));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("png should encode");
    bytes.into_inner()
}

pub fn fixed_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 9, 17, 4, 5)
        .single()
        .expect("valid timestamp")
}
