// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `fetch`    — makes the dataset available locally
//   2. `train`    — trains the classifier and saves it
//   3. `evaluate` — trains if needed, then measures the model
//   4. `predict`  — classifies one image with the saved model
//
// Results are printed to stdout as pretty JSON; logs go
// through tracing.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use burn::tensor::backend::{AutodiffBackend, Backend};
use clap::Parser;
use serde_json::json;

use crate::application::{
    config::{ComputeDevice, PipelineConfig},
    corpus::resolve_dataset_root,
    evaluate_use_case::EvaluateUseCase,
    predict_use_case::PredictUseCase,
    train_use_case::TrainUseCase,
};
use crate::domain::{emotion::EmotionReport, history::TrainingHistory};
use crate::infra::checkpoint::ModelStore;
use crate::ml::{CpuBackend, CpuInference, GpuBackend, GpuInference};
use commands::{Commands, FetchArgs, PipelineArgs, PredictArgs};

#[derive(Parser, Debug)]
#[command(
    name = "emotion-trainer",
    version = "0.1.0",
    about = "Train a CNN facial emotion classifier, evaluate it, and predict emotions in images."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fetch(args)    => run_fetch(args),
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
        }
    }
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    let cfg: PipelineConfig = args.dataset.into();
    let root = resolve_dataset_root(&cfg)?;
    println!("{}", root.display());
    Ok(())
}

fn run_train(args: PipelineArgs) -> Result<()> {
    let cfg: PipelineConfig = args.into();
    tracing::info!("Training with {}", serde_json::to_string(&cfg)?);

    let device  = cfg.device;
    let history = match device {
        ComputeDevice::Wgpu => train_on::<GpuBackend>(cfg)?,
        ComputeDevice::Cpu  => train_on::<CpuBackend>(cfg)?,
    };

    print_json(&json!({
        "message": "Model trained successfully",
        "history": history,
    }))
}

fn run_evaluate(args: PipelineArgs) -> Result<()> {
    let cfg: PipelineConfig = args.into();
    let device = cfg.device;

    let metrics = match device {
        ComputeDevice::Wgpu => EvaluateUseCase::<GpuBackend>::new(cfg, Default::default()).execute()?,
        ComputeDevice::Cpu  => EvaluateUseCase::<CpuBackend>::new(cfg, Default::default()).execute()?,
    };

    print_json(&json!({
        "message": "Model evaluated successfully",
        "metrics": metrics,
    }))
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let store  = ModelStore::new(args.model_path.clone());
    let report = match ComputeDevice::from(args.device) {
        ComputeDevice::Wgpu => predict_on::<GpuInference>(&store, &args)?,
        ComputeDevice::Cpu  => predict_on::<CpuInference>(&store, &args)?,
    };
    print_json(&report)
}

fn train_on<B: AutodiffBackend>(cfg: PipelineConfig) -> Result<TrainingHistory> {
    TrainUseCase::<B>::new(cfg, Default::default()).execute()
}

fn predict_on<B: Backend>(
    store: &ModelStore,
    args: &PredictArgs,
) -> Result<EmotionReport> {
    let use_case = PredictUseCase::<B>::new(store, &Default::default())?;
    match (&args.image, &args.base64) {
        (Some(path), _)    => use_case.classify_file(path),
        (None, Some(data)) => use_case.classify_base64(data),
        (None, None)       => anyhow::bail!("Either --image or --base64 is required"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
