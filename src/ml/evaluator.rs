// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model over a dataset without updating weights and
// reports mean loss and accuracy.
//
// Used twice:
//   - by the training loop, once per epoch, on the validation
//     partition (model.valid() on the inner backend)
//   - by the evaluate use case, on a freshly re-derived
//     validation partition and a reloaded model
//
// Loss is averaged per SAMPLE, not per batch, so a short final
// batch does not get the same weight as a full one.

use anyhow::{bail, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::{
    batcher::{EmotionBatch, EmotionBatcher},
    dataset::ImageDataset,
};
use crate::domain::history::EvaluationMetrics;
use crate::ml::model::{categorical_cross_entropy, count_correct, EmotionCnn};

/// Evaluate `model` on every sample of `dataset`
pub fn evaluate_model<B: Backend>(
    model:      &EmotionCnn<B>,
    dataset:    ImageDataset,
    batch_size: usize,
    image_size: usize,
    device:     &B::Device,
) -> Result<EvaluationMetrics> {
    let loader = DataLoaderBuilder::new(EmotionBatcher::<B>::new(device.clone(), image_size))
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset);

    evaluate_batches(model, &*loader)
}

/// Evaluate `model` on every batch produced by `loader`.
///
/// Returns NaN loss and zero accuracy when the loader is empty.
pub fn evaluate_batches<B: Backend>(
    model:  &EmotionCnn<B>,
    loader: &dyn DataLoader<EmotionBatch<B>>,
) -> Result<EvaluationMetrics> {
    let expected_classes = model.num_classes();

    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let [batch_size, num_classes] = batch.targets.dims();
        check_label_width(num_classes, expected_classes)?;

        let logits = model.forward(batch.images);
        let loss: f64 = categorical_cross_entropy(logits.clone(), batch.targets.clone())
            .into_scalar()
            .elem::<f64>();

        loss_sum += loss * batch_size as f64;
        correct  += count_correct(logits, batch.targets);
        total    += batch_size;
    }

    if total == 0 {
        return Ok(EvaluationMetrics { loss: f64::NAN, accuracy: 0.0 });
    }

    Ok(EvaluationMetrics {
        loss:     loss_sum / total as f64,
        accuracy: correct as f64 / total as f64,
    })
}

/// Fail instead of panicking inside the framework on a shape mismatch
pub fn check_label_width(label_width: usize, model_width: usize) -> Result<()> {
    if label_width != model_width {
        bail!(
            "Label encoding has {label_width} classes but the model outputs {model_width}; \
             the dataset's classes no longer match the trained model"
        );
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::EncodedSample;
    use crate::ml::model::EmotionCnnConfig;
    use burn::backend::NdArray;

    fn dataset(count: usize, num_classes: usize) -> ImageDataset {
        let samples = (0..count)
            .map(|i| {
                let mut target = vec![0.0; num_classes];
                target[i % num_classes] = 1.0;
                EncodedSample { pixels: vec![(i % 7) as f32 / 7.0; 48 * 48], target }
            })
            .collect();
        ImageDataset::new(samples)
    }

    #[test]
    fn test_metrics_are_finite_and_bounded() {
        let device = Default::default();
        let model: EmotionCnn<NdArray> = EmotionCnnConfig::new(3).init(&device);

        let m = evaluate_model(&model, dataset(7, 3), 4, 48, &device).unwrap();
        assert!(m.loss.is_finite() && m.loss > 0.0);
        assert!((0.0..=1.0).contains(&m.accuracy));
    }

    #[test]
    fn test_empty_dataset_gives_nan_loss() {
        let device = Default::default();
        let model: EmotionCnn<NdArray> = EmotionCnnConfig::new(2).init(&device);

        let m = evaluate_model(&model, ImageDataset::new(Vec::new()), 4, 48, &device).unwrap();
        assert!(m.loss.is_nan());
        assert_eq!(m.accuracy, 0.0);
    }

    #[test]
    fn test_class_count_mismatch_is_an_error() {
        let device = Default::default();
        let model: EmotionCnn<NdArray> = EmotionCnnConfig::new(6).init(&device);

        let err = evaluate_model(&model, dataset(4, 2), 4, 48, &device).unwrap_err();
        assert!(err.to_string().contains("2 classes"));
    }
}
