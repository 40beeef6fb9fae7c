// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles cross-cutting persistence concerns:
//
//   checkpoint.rs — The model artifact
//                   Weights through Burn's MessagePack+gzip
//                   recorder, plus a JSON metadata sidecar so
//                   the model can be rebuilt before loading.
//                   One fixed path, replaced on every save.
//
//   metrics.rs    — Training metrics logging
//                   Writes epoch-level metrics (loss,
//                   accuracy) to a CSV file for later
//                   analysis and plotting.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model artifact saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
