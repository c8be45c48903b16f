use ml_inference_core::contract::Prediction;

pub trait ImageClassifier {
    /// Classifies encoded image bytes and returns the `top_k` labels, most
    /// probable first.
    fn classify(&self, image: &[u8], top_k: usize) -> Result<Vec<Prediction>, String>;
}

/// Produces a ready classifier; the batch job loads one per run.
pub trait ModelLoader {
    fn load(&self) -> Result<Box<dyn ImageClassifier>, String>;
}
