// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<EncodedSample>
// into device tensors.
//
// How batching works here:
//   Input:  N samples, each with H×W pixels and a C-wide one-hot target
//   Output: EmotionBatch with
//             images  [N, 1, H, W]
//             targets [N, C]
//
//   All pixel grids are flattened into one long Vec and
//   reshaped in one go:
//   [s1_p1, ..., s1_pHW, s2_p1, ..., sN_pHW] → [N, 1, H, W]
//
// The loader already resized every image to the same square,
// so no padding is needed. H = W = the batcher's image_size.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::EncodedSample;

// ─── EmotionBatch ─────────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct EmotionBatch<B: Backend> {
    /// Grayscale images, shape: [batch_size, 1, height, width]
    pub images: Tensor<B, 4>,

    /// One-hot targets, shape: [batch_size, num_classes]
    pub targets: Tensor<B, 2>,
}

// ─── EmotionBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct EmotionBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,

    /// Edge length of the square images
    pub image_size: usize,
}

impl<B: Backend> EmotionBatcher<B> {
    pub fn new(device: B::Device, image_size: usize) -> Self {
        Self { device, image_size }
    }
}

impl<B: Backend> Batcher<EncodedSample, EmotionBatch<B>> for EmotionBatcher<B> {
    fn batch(&self, items: Vec<EncodedSample>) -> EmotionBatch<B> {
        let batch_size  = items.len();
        let num_classes = items.first().map(|s| s.target.len()).unwrap_or(0);
        let side        = self.image_size;

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let targets: Vec<f32> = items
            .iter()
            .flat_map(|s| s.target.iter().copied())
            .collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, 1, side, side]),
            &self.device,
        );

        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, num_classes]),
            &self.device,
        );

        EmotionBatch { images, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device  = Default::default();
        let batcher = EmotionBatcher::<NdArray>::new(device, 4);

        let items = vec![
            EncodedSample { pixels: vec![0.5; 16], target: vec![1.0, 0.0, 0.0] },
            EncodedSample { pixels: vec![0.1; 16], target: vec![0.0, 0.0, 1.0] },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.images.dims(),  [2, 1, 4, 4]);
        assert_eq!(batch.targets.dims(), [2, 3]);
    }

    #[test]
    fn test_pixels_keep_sample_order() {
        let batcher = EmotionBatcher::<NdArray>::new(Default::default(), 2);
        let items = vec![
            EncodedSample { pixels: vec![0.0, 0.1, 0.2, 0.3], target: vec![1.0] },
            EncodedSample { pixels: vec![0.4, 0.5, 0.6, 0.7], target: vec![1.0] },
        ];

        let values: Vec<f32> = batcher
            .batch(items)
            .images
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert_eq!(values, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
    }
}
