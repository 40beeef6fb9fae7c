use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::encoder::LabelEncoder;
use crate::domain::sample::ImageSample;

/// One sample ready for batching: normalised pixels plus one-hot target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedSample {
    pub pixels: Vec<f32>,
    pub target: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct ImageDataset {
    samples: Vec<EncodedSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<EncodedSample>) -> Self { Self { samples } }

    /// Encode a raw corpus with the given label encoder
    pub fn encode(samples: Vec<ImageSample>, encoder: &LabelEncoder) -> Result<Self> {
        let labels: Vec<&str> = samples.iter().map(|s| s.label.as_str()).collect();
        let targets = encoder.encode_all(&labels)?;

        let encoded = samples
            .into_iter()
            .zip(targets)
            .map(|(s, target)| EncodedSample { pixels: s.pixels, target })
            .collect();
        Ok(Self::new(encoded))
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<EncodedSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<EncodedSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
