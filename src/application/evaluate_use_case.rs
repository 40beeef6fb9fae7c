// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Measures the persisted model on a validation partition:
//
//   Step 1: If no model artifact exists yet, run the full
//           TrainUseCase first; evaluation is never skipped
//   Step 2: Re-load the corpus and re-encode its labels
//   Step 3: Re-derive a fresh 80 / 20 split (not the one used
//           by the last training run)
//   Step 4: Load the model and compute loss / accuracy
//
// The model runs on B::InnerBackend: no gradients are needed.

use anyhow::Result;
use burn::tensor::backend::AutodiffBackend;
use std::marker::PhantomData;

use crate::application::config::PipelineConfig;
use crate::application::corpus::prepare_corpus;
use crate::application::train_use_case::TrainUseCase;
use crate::domain::history::EvaluationMetrics;
use crate::ml::evaluator::{check_label_width, evaluate_model};

pub struct EvaluateUseCase<B: AutodiffBackend> {
    config:   PipelineConfig,
    device:   B::Device,
    _backend: PhantomData<B>,
}

impl<B: AutodiffBackend> EvaluateUseCase<B> {
    pub fn new(config: PipelineConfig, device: B::Device) -> Self {
        Self { config, device, _backend: PhantomData }
    }

    pub fn execute(&self) -> Result<EvaluationMetrics> {
        let cfg   = &self.config;
        let store = cfg.model_store();

        // ── Step 1: Train on demand ───────────────────────────────────────────
        if !store.exists() {
            tracing::info!(
                "No trained model at '{}', training one first",
                store.weights_path().display()
            );
            TrainUseCase::<B>::new(cfg.clone(), self.device.clone()).execute()?;
        }

        // ── Steps 2 + 3: Independent corpus, encoding and split ───────────────
        let corpus = prepare_corpus(cfg)?;

        // ── Step 4: Load and evaluate ─────────────────────────────────────────
        let (model, metadata) = store.load::<B::InnerBackend>(&self.device)?;
        check_label_width(corpus.encoder.num_classes(), model.num_classes())?;

        if metadata.classes != corpus.encoder.classes() {
            tracing::warn!(
                "Dataset classes {:?} differ from the classes the model was trained on {:?}",
                corpus.encoder.classes(),
                metadata.classes
            );
        }

        let metrics = evaluate_model(
            &model,
            corpus.validation,
            cfg.batch_size,
            metadata.model.image_size,
            &self.device,
        )?;

        tracing::info!(
            "Evaluation: loss={:.4}, accuracy={:.1}%",
            metrics.loss,
            metrics.accuracy * 100.0
        );
        Ok(metrics)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::test_config;
    use crate::data::loader::tests::write_class;
    use crate::ml::CpuBackend;

    #[test]
    fn test_evaluate_without_artifact_trains_first() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "angry", 4);
        write_class(data.path(), "happy", 4);

        let cfg = test_config(data.path(), model.path());
        assert!(!cfg.model_store().exists());

        let metrics = EvaluateUseCase::<CpuBackend>::new(cfg.clone(), Default::default())
            .execute()
            .unwrap();

        assert!(cfg.model_store().exists());
        assert!(metrics.loss.is_finite());
        assert!((0.0..=1.0).contains(&metrics.accuracy));
    }

    #[test]
    fn test_evaluate_reuses_existing_artifact() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "happy", 5);
        write_class(data.path(), "sad", 5);

        let cfg = test_config(data.path(), model.path());
        TrainUseCase::<CpuBackend>::new(cfg.clone(), Default::default())
            .execute()
            .unwrap();

        let weights  = cfg.model_store().weights_path();
        let modified = std::fs::metadata(&weights).unwrap().modified().unwrap();

        EvaluateUseCase::<CpuBackend>::new(cfg, Default::default())
            .execute()
            .unwrap();

        // No retraining: the weights file was not rewritten
        assert_eq!(std::fs::metadata(&weights).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_class_set_change_is_reported() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "happy", 4);
        write_class(data.path(), "sad", 4);

        let cfg = test_config(data.path(), model.path());
        TrainUseCase::<CpuBackend>::new(cfg.clone(), Default::default())
            .execute()
            .unwrap();

        // A third class appears after training
        write_class(data.path(), "angry", 4);

        let err = EvaluateUseCase::<CpuBackend>::new(cfg, Default::default())
            .execute()
            .unwrap_err();
        assert!(err.to_string().contains("3 classes"));
    }

    #[test]
    fn test_empty_corpus_fails_without_artifact() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(data.path().join("sad")).unwrap();

        let cfg = test_config(data.path(), model.path());
        let err = EvaluateUseCase::<CpuBackend>::new(cfg.clone(), Default::default())
            .execute()
            .unwrap_err();

        assert!(err.to_string().contains("No images could be loaded"));
        assert!(!cfg.model_store().exists());
    }
}
