// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn model and everything that drives
// it. Apart from the Dataset/Batcher impls in the data layer and
// the recorder in infra, no other layer imports from burn.
//
// What's in this layer:
//
//   model.rs      — The convolutional emotion classifier
//                   2 × (conv 3×3 + ReLU + max-pool 2×2),
//                   dense 128 + dropout, dense C output,
//                   categorical cross-entropy on one-hot targets
//
//   trainer.rs    — The training loop
//                   Forward pass, loss, backward pass, Adam
//                   step, per-epoch validation and history
//
//   evaluator.rs  — Loss / accuracy over a whole dataset
//
//   inferencer.rs — Loads the persisted model and returns
//                   class probabilities for one image
//
// Backends:
//   GpuBackend  Autodiff<Wgpu>     (default)
//   CpuBackend  Autodiff<NdArray>  (no GPU required)
// Prediction needs no gradients and runs on the plain
// GpuInference / CpuInference backends instead.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

use burn::backend::{Autodiff, NdArray, Wgpu};

/// Convolutional emotion classifier architecture
pub mod model;

/// Full training loop with validation
pub mod trainer;

/// Dataset-wide loss and accuracy
pub mod evaluator;

/// Inference engine — loads the artifact and predicts emotions
pub mod inferencer;

pub type GpuBackend = Autodiff<Wgpu>;
pub type CpuBackend = Autodiff<NdArray>;

pub type GpuInference = Wgpu;
pub type CpuInference = NdArray;
