// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from a remote dataset all the
// way to tensor batches.
//
// The pipeline flows in this order:
//
//   Kaggle dataset (zip)
//       │
//       ▼
//   DatasetSource      → downloads / caches, returns a local root
//       │
//       ▼
//   ImageFolderLoader  → walks class directories, decodes images
//       │                (via ImagePreprocessor: gray, 48×48, [0,1])
//       ▼
//   LabelEncoder       → class names → one-hot vectors
//       │
//       ▼
//   split_train_val    → 80 / 20 shuffled split
//       │
//       ▼
//   ImageDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   EmotionBatcher     → stacks samples into tensor batches
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Resolves the dataset locally (download + cache, or a given folder)
pub mod source;

/// Walks a class-per-directory image folder
pub mod loader;

/// Decodes, grayscales, resizes and normalises images
pub mod preprocessor;

/// Sorted label → one-hot encoding
pub mod encoder;

/// Implements Burn's Dataset trait for encoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
