// ============================================================
// Layer 2 — Pipeline Configuration
// ============================================================
// All settings for a train / evaluate run.
// Serialisable so it can be logged or saved as JSON.
//
// The model topology is NOT configurable here, only where the
// data comes from, where the artifact goes, and the loop
// budget. num_classes is the class count a full dataset is
// expected to have; the real output width always comes from
// the labels actually found on disk.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::preprocessor::IMAGE_SIZE;
use crate::data::source::{KaggleDatasetSource, LocalDatasetSource, DEFAULT_DATASET};
use crate::domain::traits::DatasetSource;
use crate::infra::checkpoint::{ModelStore, DEFAULT_MODEL_STEM};
use crate::ml::trainer::TrainingSettings;

/// Six emotions: happy, sad, angry, frustrated, nervous, excited
pub const EXPECTED_CLASSES: usize = 6;

/// Which burn backend runs the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    #[default]
    Wgpu,
    Cpu,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Kaggle handle "owner/slug" of the dataset to download
    pub dataset:             String,
    /// Use this local folder instead of downloading
    pub dataset_dir:         Option<PathBuf>,
    /// Sub-directory of the dataset root holding the class folders
    pub dataset_subdir:      Option<String>,
    /// Override of the download cache directory
    pub cache_dir:           Option<PathBuf>,
    /// Artifact stem (weights, metadata and metrics share it)
    pub model_path:          PathBuf,
    pub image_size:          usize,
    pub num_classes:         usize,
    pub epochs:              usize,
    pub batch_size:          usize,
    pub learning_rate:       f64,
    pub validation_fraction: f64,
    /// None → a different random split every run
    pub seed:                Option<u64>,
    pub device:              ComputeDevice,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset:             DEFAULT_DATASET.to_string(),
            dataset_dir:         None,
            dataset_subdir:      None,
            cache_dir:           None,
            model_path:          PathBuf::from(DEFAULT_MODEL_STEM),
            image_size:          IMAGE_SIZE as usize,
            num_classes:         EXPECTED_CLASSES,
            epochs:              5,
            batch_size:          32,
            learning_rate:       1e-3,
            validation_fraction: 0.2,
            seed:                None,
            device:              ComputeDevice::Wgpu,
        }
    }
}

impl PipelineConfig {
    /// Local folder if one was given, otherwise the Kaggle download
    pub fn dataset_source(&self) -> Result<Box<dyn DatasetSource>> {
        Ok(match &self.dataset_dir {
            Some(dir) => Box::new(LocalDatasetSource::new(dir.clone())),
            None      => Box::new(KaggleDatasetSource::new(&self.dataset, self.cache_dir.clone())?),
        })
    }

    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(self.model_path.clone())
    }

    pub fn training_settings(&self, shuffle_seed: u64) -> TrainingSettings {
        TrainingSettings {
            epochs:        self.epochs,
            batch_size:    self.batch_size,
            learning_rate: self.learning_rate,
            shuffle_seed,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.image_size, 48);
        assert_eq!(cfg.num_classes, 6);
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.batch_size, 32);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_device_serialises_lowercase() {
        let json = serde_json::to_string(&ComputeDevice::Cpu).unwrap();
        assert_eq!(json, "\"cpu\"");
    }

    #[test]
    fn test_local_dir_takes_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig {
            dataset:     "not a handle".to_string(),
            dataset_dir: Some(tmp.path().to_path_buf()),
            ..PipelineConfig::default()
        };
        assert_eq!(cfg.dataset_source().unwrap().resolve().unwrap(), tmp.path());
    }

    #[test]
    fn test_bad_handle_fails_without_local_dir() {
        let cfg = PipelineConfig { dataset: "nope".to_string(), ..PipelineConfig::default() };
        assert!(cfg.dataset_source().is_err());
    }
}
