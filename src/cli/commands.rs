// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `fetch`, `train`, `evaluate`
// and `predict`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::config::{ComputeDevice, PipelineConfig, EXPECTED_CLASSES};
use crate::data::preprocessor::IMAGE_SIZE;
use crate::data::source::DEFAULT_DATASET;
use crate::infra::checkpoint::DEFAULT_MODEL_STEM;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the dataset (if not cached) and print its local path
    Fetch(FetchArgs),

    /// Train the emotion classifier and save it
    Train(PipelineArgs),

    /// Evaluate the saved model, training one first if none exists
    Evaluate(PipelineArgs),

    /// Predict the emotions in a single image
    Predict(PredictArgs),
}

/// Which backend to run on
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum DeviceArg {
    /// GPU through wgpu
    #[default]
    Wgpu,
    /// CPU through ndarray
    Cpu,
}

impl From<DeviceArg> for ComputeDevice {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Wgpu => ComputeDevice::Wgpu,
            DeviceArg::Cpu  => ComputeDevice::Cpu,
        }
    }
}

/// Where the dataset comes from
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Kaggle dataset handle, "owner/slug"
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Use this local folder of class sub-directories instead of downloading
    #[arg(long)]
    pub dataset_dir: Option<PathBuf>,

    /// Sub-directory of the dataset root holding the class folders
    /// (default: "train" when the root is split into train/ and test/)
    #[arg(long)]
    pub subset: Option<String>,

    /// Download cache directory (default: $EMOTION_TRAINER_CACHE or the user cache dir)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

/// Arguments shared by `train` and `evaluate`.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Model artifact stem; ".mpk.gz" and ".json" are appended
    #[arg(long, default_value = DEFAULT_MODEL_STEM)]
    pub model_path: PathBuf,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Number of images processed together in one step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of the corpus held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Edge length images are resized to before training
    #[arg(long, default_value_t = IMAGE_SIZE as usize)]
    pub image_size: usize,

    /// Number of emotion classes the dataset is expected to have
    #[arg(long, default_value_t = EXPECTED_CLASSES)]
    pub num_classes: usize,

    /// Fix the split, shuffle order and weight initialisation
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = DeviceArg::Wgpu)]
    pub device: DeviceArg,
}

impl From<DatasetArgs> for PipelineConfig {
    fn from(a: DatasetArgs) -> Self {
        PipelineConfig {
            dataset:        a.dataset,
            dataset_dir:    a.dataset_dir,
            dataset_subdir: a.subset,
            cache_dir:      a.cache_dir,
            ..PipelineConfig::default()
        }
    }
}

/// The boundary between Layer 1 and Layer 2:
/// the application layer never sees clap types.
impl From<PipelineArgs> for PipelineConfig {
    fn from(a: PipelineArgs) -> Self {
        PipelineConfig {
            model_path:          a.model_path,
            image_size:          a.image_size,
            epochs:              a.epochs,
            batch_size:          a.batch_size,
            learning_rate:       a.lr,
            validation_fraction: a.val_fraction,
            num_classes:         a.num_classes,
            seed:                a.seed,
            device:              a.device.into(),
            ..PipelineConfig::from(a.dataset)
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to an image file
    #[arg(long, conflicts_with = "base64", required_unless_present = "base64")]
    pub image: Option<PathBuf>,

    /// Base64 image payload, optionally a "data:image/...;base64," URL
    #[arg(long)]
    pub base64: Option<String>,

    /// Model artifact stem written by `train`
    #[arg(long, default_value = DEFAULT_MODEL_STEM)]
    pub model_path: PathBuf,

    #[arg(long, value_enum, default_value_t = DeviceArg::Wgpu)]
    pub device: DeviceArg,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("emotion-trainer").chain(args.iter().copied()))
    }

    #[test]
    fn test_train_defaults_match_pipeline_defaults() {
        let Commands::Train(args) = parse(&["train"]).unwrap().command else {
            panic!("expected train");
        };
        let cfg: PipelineConfig = args.into();
        let def = PipelineConfig::default();

        assert_eq!(cfg.dataset, def.dataset);
        assert_eq!(cfg.model_path, def.model_path);
        assert_eq!(cfg.image_size, def.image_size);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.learning_rate, def.learning_rate);
        assert_eq!(cfg.validation_fraction, def.validation_fraction);
        assert_eq!(cfg.num_classes, def.num_classes);
        assert_eq!(cfg.device, def.device);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_evaluate_flags_reach_config() {
        let cli = parse(&[
            "evaluate", "--dataset-dir", "faces", "--subset", "test",
            "--epochs", "2", "--seed", "9", "--device", "cpu", "--image-size", "64",
        ])
        .unwrap();
        let Commands::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        let cfg: PipelineConfig = args.into();

        assert_eq!(cfg.dataset_dir, Some(PathBuf::from("faces")));
        assert_eq!(cfg.dataset_subdir.as_deref(), Some("test"));
        assert_eq!(cfg.epochs, 2);
        assert_eq!(cfg.image_size, 64);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.device, ComputeDevice::Cpu);
    }

    #[test]
    fn test_predict_needs_exactly_one_input() {
        assert!(parse(&["predict"]).is_err());
        assert!(parse(&["predict", "--image", "a.png", "--base64", "AAAA"]).is_err());
        assert!(parse(&["predict", "--base64", "AAAA"]).is_ok());
    }
}
