// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Turns any decodable image into the fixed input the CNN
// expects.
//
// Steps (applied in order):
//   1. Decode the raw bytes (format guessed from content)
//   2. Convert to a single 8-bit grayscale channel
//   3. Resize to size × size with bilinear (Triangle) filtering
//   4. Divide every intensity by 255 → values in [0.0, 1.0]
//
// The same preprocessing is used for training, evaluation and
// prediction so the model always sees identically shaped data,
// whatever the source resolution or colour depth was.
//
// Browser uploads usually arrive as data URLs:
//   "data:image/png;base64,iVBORw0KGgo..."
// decode_base64_image() strips everything up to "base64," and
// decodes the rest.
//
// Reference: image crate documentation (imageops::resize)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use base64::Engine;
use image::{imageops::FilterType, DynamicImage};
use std::path::Path;

/// Default edge length of the square model input
pub const IMAGE_SIZE: u32 = 48;

/// Maximum 8-bit intensity, used for normalisation
const MAX_INTENSITY: f32 = 255.0;

pub struct ImagePreprocessor {
    /// Target width and height in pixels
    size: u32,
}

impl ImagePreprocessor {
    /// Create a preprocessor producing size × size grids
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    /// Grayscale → resize → normalise an already decoded image
    pub fn prepare(&self, image: &DynamicImage) -> Vec<f32> {
        let gray    = image.to_luma8();
        let resized = image::imageops::resize(&gray, self.size, self.size, FilterType::Triangle);

        resized
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / MAX_INTENSITY)
            .collect()
    }

    /// Read an image file and prepare it
    pub fn prepare_file(&self, path: &Path) -> Result<Vec<f32>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        self.prepare_bytes(&bytes)
            .with_context(|| format!("Cannot decode image '{}'", path.display()))
    }

    /// Decode raw encoded bytes (PNG, JPEG, ...) and prepare them
    pub fn prepare_bytes(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        let image = image::load_from_memory(bytes).context("Unsupported or corrupt image data")?;
        Ok(self.prepare(&image))
    }

    /// Decode a base64 payload (plain or data URL) and prepare it
    pub fn prepare_base64(&self, payload: &str) -> Result<Vec<f32>> {
        let bytes = decode_base64_image(payload)?;
        self.prepare_bytes(&bytes)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(IMAGE_SIZE)
    }
}

/// Decode a base64 image payload, accepting the "data:...;base64," prefix
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once("base64,") {
        Some((_, rest)) => rest,
        None            => payload,
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .context("Image payload is not valid base64")
}
