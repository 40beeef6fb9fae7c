// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, bail, Result};
use burn::prelude::*;

use crate::infra::checkpoint::ModelStore;
use crate::ml::model::EmotionCnn;

pub struct Inferencer<B: Backend> {
    model:      EmotionCnn<B>,
    classes:    Vec<String>,
    image_size: usize,
    device:     B::Device,
}

impl<B: Backend> Inferencer<B> {
    /// Load the persisted model and its class list
    pub fn from_store(store: &ModelStore, device: &B::Device) -> Result<Self> {
        let (model, metadata) = store.load::<B>(device)?;

        if metadata.classes.len() != model.num_classes() {
            bail!(
                "Model artifact lists {} classes but outputs {}",
                metadata.classes.len(),
                model.num_classes()
            );
        }

        tracing::info!("Model loaded with classes {:?}", metadata.classes);
        Ok(Self {
            model,
            classes:    metadata.classes,
            image_size: metadata.model.image_size,
            device:     device.clone(),
        })
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    /// Class probabilities for one prepared image (image_size² values in [0,1])
    pub fn predict(&self, pixels: Vec<f32>) -> Result<Vec<(String, f32)>> {
        let expected = self.image_size * self.image_size;
        if pixels.len() != expected {
            bail!("Expected {} pixel values, got {}", expected, pixels.len());
        }

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [1, 1, self.image_size, self.image_size]),
            &self.device,
        );

        let probs: Vec<f32> = self
            .model
            .forward_probabilities(images)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        Ok(self.classes.iter().cloned().zip(probs).collect())
    }
}
