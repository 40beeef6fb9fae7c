// ============================================================
// Layer 3 — ImageSample Domain Type
// ============================================================
// One labelled training example: a grayscale pixel grid and
// the name of the emotion class it belongs to.
//
// Pixel layout:
//   The grid is stored flat in row-major order with a single
//   trailing channel, i.e. height × width × 1 values.
//   Because there is only one channel, this is the same memory
//   layout as channel-first [1, height, width], so the batcher
//   can reshape it straight into an NCHW tensor.
//
// Every value is already normalised into [0.0, 1.0].
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// A single decoded, resized and normalised image plus its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSample {
    /// Flattened pixel intensities, length = height × width × 1
    pub pixels: Vec<f32>,

    /// Class name taken from the parent directory (lowercased)
    pub label: String,
}

impl ImageSample {
    pub fn new(pixels: Vec<f32>, label: impl Into<String>) -> Self {
        Self {
            pixels,
            label: label.into(),
        }
    }
}
