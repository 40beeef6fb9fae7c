// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores the trained classifier at one fixed path.
//
// What gets saved:
//   1. <stem>.mpk.gz  — model weights (MessagePack + gzip)
//   2. <stem>.json    — metadata: model config, class names,
//                       epoch count
//
// Why save the metadata separately?
//   The output width of the model depends on how many classes
//   the training corpus had. To load the weights we must first
//   rebuild a model of exactly that shape, so the config has to
//   be readable before the weights are.
//
// Every save overwrites the previous artifact. Both files are
// first written under a staging name and then renamed over the
// old ones, so a crash mid-save never leaves a truncated model.
// There is no locking: concurrent train and evaluate runs
// against the same stem are not supported.
//
// File layout for the default stem:
//   emotion_detection_model.mpk.gz
//   emotion_detection_model.json
//   emotion_detection_model_metrics.csv   (written by MetricsLogger)
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ml::model::{EmotionCnn, EmotionCnnConfig};

/// Default artifact stem, relative to the working directory
pub const DEFAULT_MODEL_STEM: &str = "emotion_detection_model";

/// Suffix of the weights file written by the recorder
const WEIGHTS_SUFFIX: &str = ".mpk.gz";

/// Artifact suffixes a user may pass along with the stem
const KNOWN_SUFFIXES: [&str; 5] = [".mpk.gz", ".mpk", ".json", ".h5", ".keras"];

/// The recorder replaces the extension of the path it is given,
/// so it gets the stem plus this placeholder to replace.
const RECORDER_PLACEHOLDER: &str = ".weights";

type ModelRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Everything needed to rebuild the model before loading weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub model:   EmotionCnnConfig,
    /// Class names in output-index order, as seen at training time
    pub classes: Vec<String>,
    pub epochs:  usize,
}

pub struct ModelStore {
    /// Path without extension, e.g. "emotion_detection_model"
    stem: PathBuf,
}

impl ModelStore {
    /// A known artifact suffix on `stem` is dropped; any other dot
    /// (e.g. "runs/v1.2") is part of the stem.
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self { stem: strip_known_suffix(stem.into()) }
    }

    pub fn weights_path(&self) -> PathBuf {
        self.sibling(WEIGHTS_SUFFIX)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.sibling(".json")
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.sibling("_metrics.csv")
    }

    /// True once a complete artifact (weights + metadata) exists
    pub fn exists(&self) -> bool {
        self.weights_path().is_file() && self.metadata_path().is_file()
    }

    /// Persist the model, replacing any previous artifact.
    pub fn save<B: Backend>(&self, model: &EmotionCnn<B>, metadata: &ArtifactMetadata) -> Result<()> {
        if let Some(parent) = self.stem.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create model directory '{}'", parent.display()))?;
        }

        // ── Weights: record under a staging stem, then rename ─────────────────
        let staging = self.sibling("_staging");
        ModelRecorder::new()
            .record(model.clone().into_record(), with_suffix(&staging, RECORDER_PLACEHOLDER))
            .with_context(|| format!("Failed to save model to '{}'", staging.display()))?;
        replace(&with_suffix(&staging, WEIGHTS_SUFFIX), &self.weights_path())?;

        // ── Metadata: write to a temp file, then rename ───────────────────────
        let json = serde_json::to_string_pretty(metadata)?;
        let tmp  = self.sibling("_staging.json");
        fs::write(&tmp, json)
            .with_context(|| format!("Cannot write '{}'", tmp.display()))?;
        replace(&tmp, &self.metadata_path())?;

        tracing::info!("Saved model to '{}'", self.weights_path().display());
        Ok(())
    }

    pub fn load_metadata(&self) -> Result<ArtifactMetadata> {
        let path = self.metadata_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read model metadata '{}'. Have you trained the model first?", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Corrupt model metadata in '{}'", path.display()))
    }

    /// Rebuild the model from metadata and load the saved weights into it
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(EmotionCnn<B>, ArtifactMetadata)> {
        let metadata = self.load_metadata()?;
        let model: EmotionCnn<B> = metadata.model.init(device);

        let record = ModelRecorder::new()
            .load(self.sibling(RECORDER_PLACEHOLDER), device)
            .with_context(|| {
                format!("Cannot load model '{}'. Have you trained the model first?",
                    self.weights_path().display())
            })?;

        tracing::debug!("Loaded model from '{}'", self.weights_path().display());
        Ok((model.load_record(record), metadata))
    }

    /// stem + suffix, e.g. "model" + "_metrics.csv"
    fn sibling(&self, suffix: &str) -> PathBuf {
        with_suffix(&self.stem, suffix)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn strip_known_suffix(path: PathBuf) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path;
    };
    match KNOWN_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
    {
        Some(stem) => path.with_file_name(stem),
        None       => path,
    }
}

fn replace(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("Cannot move '{}' to '{}'", from.display(), to.display()))
}
