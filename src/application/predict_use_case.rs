// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies a single image with the persisted model:
//
//   Step 1: Preprocess the image    (file path or base64 payload)
//   Step 2: Run the model           (softmax over the classes)
//   Step 3: Shape the result        (EmotionReport)
//
// The artifact is loaded once in new(); every classify call
// reuses it. No training happens here: a missing artifact is
// an error.

use anyhow::{bail, Result};
use burn::prelude::*;
use std::path::Path;

use crate::data::preprocessor::ImagePreprocessor;
use crate::domain::emotion::EmotionReport;
use crate::infra::checkpoint::ModelStore;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase<B: Backend> {
    inferencer:   Inferencer<B>,
    preprocessor: ImagePreprocessor,
}

impl<B: Backend> PredictUseCase<B> {
    pub fn new(store: &ModelStore, device: &B::Device) -> Result<Self> {
        if !store.exists() {
            bail!(
                "No trained model at '{}'. Run `train` first.",
                store.weights_path().display()
            );
        }

        let inferencer   = Inferencer::from_store(store, device)?;
        let preprocessor = ImagePreprocessor::new(inferencer.image_size() as u32);
        Ok(Self { inferencer, preprocessor })
    }

    pub fn classify_file(&self, path: &Path) -> Result<EmotionReport> {
        let pixels = self.preprocessor.prepare_file(path)?;
        self.classify_pixels(pixels)
    }

    /// Accepts plain base64 or a "data:image/...;base64," URL
    pub fn classify_base64(&self, payload: &str) -> Result<EmotionReport> {
        let pixels = self.preprocessor.prepare_base64(payload)?;
        self.classify_pixels(pixels)
    }

    fn classify_pixels(&self, pixels: Vec<f32>) -> Result<EmotionReport> {
        let scores = self.inferencer.predict(pixels)?;
        let report = EmotionReport::from_scores(scores)?;
        tracing::info!(
            "Dominant emotion: {} ({:.3})",
            report.dominant_emotion.label,
            report.dominant_emotion.score
        );
        Ok(report)
    }
}
