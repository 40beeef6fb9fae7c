// ============================================================
// Layer 2 — Corpus Preparation
// ============================================================
// The steps shared by training and evaluation:
//
//   Step 1: Resolve the dataset root     (download or local dir)
//   Step 2: Load and preprocess images   (48×48 gray, [0,1])
//   Step 3: Fit the label encoder        (sorted distinct labels)
//   Step 4: Split train / validation     (shuffled, 80 / 20)
//   Step 5: Wrap both parts as datasets  (one-hot targets)
//
// Training and evaluation each call this independently, so the
// encoder and the split are re-derived every time.
//
// Datasets that ship pre-split as train/ and test/ (the default
// Kaggle dataset does) are read from train/ unless another
// subset is configured.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::application::config::PipelineConfig;
use crate::data::{
    dataset::ImageDataset,
    encoder::LabelEncoder,
    loader::ImageFolderLoader,
    preprocessor::ImagePreprocessor,
    splitter::split_train_val,
};
use crate::domain::traits::SampleSource;

/// Subset used when the dataset root is split into train/ and test/
pub const DEFAULT_SUBSET: &str = "train";

pub struct PreparedCorpus {
    pub encoder:    LabelEncoder,
    pub train:      ImageDataset,
    pub validation: ImageDataset,
}

/// Step 1 only: make the dataset available and return the class root
pub fn resolve_dataset_root(cfg: &PipelineConfig) -> Result<PathBuf> {
    let root = cfg.dataset_source()?.resolve()?;
    Ok(match &cfg.dataset_subdir {
        Some(sub) => root.join(sub),
        None      => default_class_root(root),
    })
}

/// root/train when the dataset is pre-split, otherwise root itself
fn default_class_root(root: PathBuf) -> PathBuf {
    let subset = root.join(DEFAULT_SUBSET);
    if is_split_layout(&subset) {
        tracing::info!("Dataset is pre-split, reading the '{}' subset", DEFAULT_SUBSET);
        subset
    } else {
        root
    }
}

/// True when `dir` holds class directories rather than images
fn is_split_layout(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    let paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    !paths.is_empty() && paths.iter().any(|p| p.is_dir()) && !paths.iter().any(|p| p.is_file())
}

pub fn prepare_corpus(cfg: &PipelineConfig) -> Result<PreparedCorpus> {
    // ── Step 1: Resolve dataset ───────────────────────────────────────────────
    let root = resolve_dataset_root(cfg)?;
    tracing::info!("Loading images from '{}'", root.display());

    // ── Step 2: Load images ───────────────────────────────────────────────────
    let loader  = ImageFolderLoader::new(ImagePreprocessor::new(cfg.image_size as u32));
    let samples = loader.load_all(&root)?;

    // ── Step 3: Encode labels ─────────────────────────────────────────────────
    let labels: Vec<&str> = samples.iter().map(|s| s.label.as_str()).collect();
    let encoder = LabelEncoder::fit(&labels);
    tracing::info!("Found {} classes: {:?}", encoder.num_classes(), encoder.classes());

    // ── Step 4: Split ─────────────────────────────────────────────────────────
    let total = samples.len();
    let (train_samples, val_samples) =
        split_train_val(samples, cfg.validation_fraction, cfg.seed);
    if train_samples.is_empty() || val_samples.is_empty() {
        bail!(
            "Cannot split {} images into training and validation sets \
             ({} train, {} validation); add more images or change the validation fraction",
            total,
            train_samples.len(),
            val_samples.len()
        );
    }

    // ── Step 5: Build datasets ────────────────────────────────────────────────
    let train      = ImageDataset::encode(train_samples, &encoder)?;
    let validation = ImageDataset::encode(val_samples, &encoder)?;
    tracing::info!(
        "Split: {} train, {} validation",
        train.sample_count(),
        validation.sample_count()
    );

    Ok(PreparedCorpus { encoder, train, validation })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::test_config;
    use crate::data::loader::tests::write_class;

    #[test]
    fn test_pre_split_dataset_reads_train_subset() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(&data.path().join("train"), "happy", 4);
        write_class(&data.path().join("train"), "sad", 4);
        write_class(&data.path().join("test"), "happy", 2);

        let cfg = test_config(data.path(), model.path());
        assert_eq!(resolve_dataset_root(&cfg).unwrap(), data.path().join("train"));

        let corpus = prepare_corpus(&cfg).unwrap();
        assert_eq!(corpus.encoder.classes(), &["happy", "sad"]);
        assert_eq!(corpus.train.sample_count() + corpus.validation.sample_count(), 8);
    }

    #[test]
    fn test_class_named_train_is_not_mistaken_for_a_subset() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "train", 3);
        write_class(data.path(), "happy", 3);

        let cfg = test_config(data.path(), model.path());
        assert_eq!(resolve_dataset_root(&cfg).unwrap(), data.path());
    }

    #[test]
    fn test_explicit_subset_wins() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(&data.path().join("train"), "happy", 2);
        write_class(&data.path().join("test"), "sad", 2);

        let cfg = PipelineConfig {
            dataset_subdir: Some("test".to_string()),
            ..test_config(data.path(), model.path())
        };
        assert_eq!(resolve_dataset_root(&cfg).unwrap(), data.path().join("test"));
    }

    #[test]
    fn test_single_image_cannot_be_split() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "happy", 1);

        let err = prepare_corpus(&test_config(data.path(), model.path()))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Cannot split 1 images"));
    }

    #[test]
    fn test_zero_validation_fraction_is_rejected() {
        let data  = tempfile::tempdir().unwrap();
        let model = tempfile::tempdir().unwrap();
        write_class(data.path(), "happy", 4);

        let cfg = PipelineConfig {
            validation_fraction: 0.0,
            ..test_config(data.path(), model.path())
        };
        assert!(prepare_corpus(&cfg).is_err());
    }
}
