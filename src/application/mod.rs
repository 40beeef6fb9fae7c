// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal: training, evaluating or predicting.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Run settings shared by every workflow
pub mod config;

// Dataset resolution, encoding and split
pub mod corpus;

// The training workflow
pub mod train_use_case;

// Train-if-needed, then measure on a fresh split
pub mod evaluate_use_case;

// Single-image emotion prediction
pub mod predict_use_case;
