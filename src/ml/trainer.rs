// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn insight:
//   - Training uses an AutodiffBackend for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - Validation batcher must also use B::InnerBackend
//   - Dropout is only active on the autodiff backend, so
//     validation runs are deterministic
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{batcher::EmotionBatcher, dataset::ImageDataset};
use crate::domain::history::{EpochMetrics, TrainingHistory};
use crate::infra::metrics::MetricsLogger;
use crate::ml::evaluator::{check_label_width, evaluate_batches};
use crate::ml::model::{categorical_cross_entropy, count_correct, EmotionCnn, EmotionCnnConfig};

/// Loop hyperparameters that are not part of the model architecture
#[derive(Debug, Clone)]
pub struct TrainingSettings {
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    /// Seed for the per-epoch shuffle of the training partition
    pub shuffle_seed:  u64,
}

pub fn run_training<B: AutodiffBackend>(
    settings:      &TrainingSettings,
    model_cfg:     &EmotionCnnConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    device:        &B::Device,
    metrics_log:   Option<&MetricsLogger>,
) -> Result<(EmotionCnn<B>, TrainingHistory)> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: EmotionCnn<B> = model_cfg.init(device);
    tracing::info!(
        "Model ready: {} classes, {}x{} input, {} flattened features",
        model_cfg.num_classes, model_cfg.image_size, model_cfg.image_size,
        model_cfg.flattened_features(),
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = EmotionBatcher::<B>::new(device.clone(), model_cfg.image_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(settings.batch_size)
        .shuffle(settings.shuffle_seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend, no autodiff overhead) ──────────
    let val_batcher = EmotionBatcher::<B::InnerBackend>::new(device.clone(), model_cfg.image_size);
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(settings.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut history = TrainingHistory::new();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=settings.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let [batch_size, num_classes] = batch.targets.dims();
            check_label_width(num_classes, model_cfg.num_classes)?;

            let logits = model.forward(batch.images);
            let loss   = categorical_cross_entropy(logits.clone(), batch.targets.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>() * batch_size as f64;
            correct  += count_correct(logits.detach(), batch.targets);
            seen     += batch_size;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(settings.learning_rate, model, grads);
        }

        let (loss, accuracy) = if seen > 0 {
            (loss_sum / seen as f64, correct as f64 / seen as f64)
        } else {
            (f64::NAN, 0.0)
        };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → EmotionCnn<B::InnerBackend>
        let val = evaluate_batches(&model.valid(), &*val_loader)?;

        let metrics = EpochMetrics::new(epoch, loss, accuracy, val.loss, val.accuracy);

        println!(
            "Epoch {:>3}/{} | loss={:.4} | accuracy={:.1}% | val_loss={:.4} | val_accuracy={:.1}%",
            epoch, settings.epochs, loss, accuracy * 100.0,
            val.loss, val.accuracy * 100.0,
        );

        if let Some(log) = metrics_log {
            log.log(&metrics)?;
        }
        history.record(&metrics);
    }

    tracing::info!("Training complete after {} epochs", history.epochs());
    Ok((model, history))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::EncodedSample;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    /// Two trivially separable classes: dark images vs bright images
    fn separable(count: usize) -> ImageDataset {
        let samples = (0..count)
            .map(|i| {
                let bright = i % 2 == 0;
                EncodedSample {
                    pixels: vec![if bright { 0.9 } else { 0.1 }; 48 * 48],
                    target: if bright { vec![1.0, 0.0] } else { vec![0.0, 1.0] },
                }
            })
            .collect();
        ImageDataset::new(samples)
    }

    #[test]
    fn test_history_has_one_entry_per_epoch() {
        let device   = Default::default();
        let settings = TrainingSettings { epochs: 3, batch_size: 4, learning_rate: 1e-3, shuffle_seed: 42 };

        let (model, history) = run_training::<TestBackend>(
            &settings,
            &EmotionCnnConfig::new(2),
            separable(8),
            separable(4),
            &device,
            None,
        )
        .unwrap();

        assert_eq!(model.num_classes(), 2);
        assert_eq!(history.epochs(), 3);
        for (name, values) in history.metrics() {
            assert_eq!(values.len(), 3, "metric {name}");
        }
        assert!(history.loss.iter().all(|l| l.is_finite()));
        assert!(history.val_accuracy.iter().all(|a| (0.0..=1.0).contains(a)));
    }

    #[test]
    fn test_mismatched_model_width_fails_cleanly() {
        let device   = Default::default();
        let settings = TrainingSettings { epochs: 1, batch_size: 4, learning_rate: 1e-3, shuffle_seed: 1 };

        let result = run_training::<TestBackend>(
            &settings,
            &EmotionCnnConfig::new(6),
            separable(4),
            separable(2),
            &device,
            None,
        );
        assert!(result.is_err());
    }
}
