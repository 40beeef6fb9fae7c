// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Seed the backend (only when a seed is configured)
//   Step 2: Load, encode and split the corpus   (Layer 4 - data)
//   Step 3: Size the model from the labels      (Layer 5 - ml)
//   Step 4: Run the training loop               (Layer 5 - ml)
//   Step 5: Persist the model, replacing any    (Layer 6 - infra)
//           previous artifact
//
// Returns the per-epoch history as plain f64 sequences.
// Any failure is returned to the caller as-is; nothing is
// retried and nothing is saved unless training finished.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;
use std::marker::PhantomData;

use crate::application::config::PipelineConfig;
use crate::application::corpus::prepare_corpus;
use crate::domain::history::TrainingHistory;
use crate::infra::{checkpoint::ArtifactMetadata, metrics::MetricsLogger};
use crate::ml::{model::EmotionCnnConfig, trainer::run_training};

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and the device; B picks the backend.
pub struct TrainUseCase<B: AutodiffBackend> {
    config:   PipelineConfig,
    device:   B::Device,
    _backend: PhantomData<B>,
}

impl<B: AutodiffBackend> TrainUseCase<B> {
    pub fn new(config: PipelineConfig, device: B::Device) -> Self {
        Self { config, device, _backend: PhantomData }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingHistory> {
        let cfg = &self.config;

        // ── Step 1: Seed ──────────────────────────────────────────────────────
        // Weight initialisation and dropout masks come from the backend RNG
        if let Some(seed) = cfg.seed {
            B::seed(seed);
        }

        // ── Step 2: Corpus ────────────────────────────────────────────────────
        let corpus = prepare_corpus(cfg)?;

        // ── Step 3: Model config ──────────────────────────────────────────────
        // Output width follows the labels actually present on disk.
        let num_classes = corpus.encoder.num_classes();
        if num_classes != cfg.num_classes {
            tracing::warn!(
                "Expected {} emotion classes but the dataset has {}; \
                 building a {}-way classifier",
                cfg.num_classes, num_classes, num_classes
            );
        }
        let model_cfg = EmotionCnnConfig::new(num_classes).with_image_size(cfg.image_size);

        // ── Step 4: Train ─────────────────────────────────────────────────────
        let store       = cfg.model_store();
        let metrics_log = MetricsLogger::create(store.metrics_path())?;
        let settings    = cfg.training_settings(cfg.seed.unwrap_or_else(rand::random));

        let (model, history) = run_training::<B>(
            &settings,
            &model_cfg,
            corpus.train,
            corpus.validation,
            &self.device,
            Some(&metrics_log),
        )?;

        // ── Step 5: Persist ───────────────────────────────────────────────────
        let metadata = ArtifactMetadata {
            model:   model_cfg,
            classes: corpus.encoder.classes().to_vec(),
            epochs:  cfg.epochs,
        };
        store.save(&model, &metadata)?;

        Ok(history)
    }
}
