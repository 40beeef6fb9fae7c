// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// concrete data sources can be swapped without touching the
// use cases:
//
//   DatasetSource  → where the dataset lives on disk
//       - KaggleDatasetSource  downloads and caches a zip
//       - LocalDatasetSource   points at an existing folder
//
//   SampleSource   → turns a dataset root into samples
//       - ImageFolderLoader    one sub-directory per class
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::sample::ImageSample;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can make a labelled dataset available locally.
pub trait DatasetSource {
    /// Ensure the dataset is present on disk and return its root.
    /// Calling this twice must not repeat expensive work.
    fn resolve(&self) -> Result<PathBuf>;
}

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can turn a dataset root into labelled samples.
pub trait SampleSource {
    /// Load every readable sample below `root`.
    /// Fails if nothing at all could be loaded.
    fn load_all(&self, root: &Path) -> Result<Vec<ImageSample>>;
}
