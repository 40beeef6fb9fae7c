// ============================================================
// Layer 4 — Image Folder Loader
// ============================================================
// Loads a labelled image dataset laid out one class per
// sub-directory:
//
//   dataset_root/
//     angry/   img_0001.png  img_0002.png ...
//     happy/   ...
//     sad/     ...
//
// The directory name (lowercased) is the label of every image
// inside it. Plain files at the root and nested directories
// inside a class directory are ignored.
//
// Every file inside a class directory is decoded through the
// ImagePreprocessor. A file that cannot be read or decoded is
// skipped with a warning; one corrupt image must not abort a
// load of thousands.
//
// Traversal order is sorted (classes, then files) so a given
// dataset always produces the same corpus order.
//
// Reference: Rust Book §9 (Error Handling)
//            image crate documentation

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::ImagePreprocessor;
use crate::domain::sample::ImageSample;
use crate::domain::traits::SampleSource;

/// Loads every image below a class-per-directory dataset root.
/// Implements the SampleSource trait from Layer 3.
pub struct ImageFolderLoader {
    preprocessor: ImagePreprocessor,
}

impl ImageFolderLoader {
    pub fn new(preprocessor: ImagePreprocessor) -> Self {
        Self { preprocessor }
    }
}

impl Default for ImageFolderLoader {
    fn default() -> Self {
        Self::new(ImagePreprocessor::default())
    }
}

impl SampleSource for ImageFolderLoader {
    fn load_all(&self, root: &Path) -> Result<Vec<ImageSample>> {
        let class_dirs = sorted_entries(root)?
            .into_iter()
            .filter(|p| p.is_dir());

        let mut samples = Vec::new();
        let mut skipped = 0usize;

        for class_dir in class_dirs {
            let label = match class_dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_lowercase(),
                None => {
                    tracing::warn!("Skipping class directory with non UTF-8 name: {}", class_dir.display());
                    continue;
                }
            };

            let mut loaded = 0usize;
            for path in sorted_entries(&class_dir)?.into_iter().filter(|p| p.is_file()) {
                match self.preprocessor.prepare_file(&path) {
                    Ok(pixels) => {
                        samples.push(ImageSample::new(pixels, label.as_str()));
                        loaded += 1;
                    }
                    // Log a warning but continue
                    Err(e) => {
                        tracing::warn!("Skipping '{}': {:#}", path.display(), e);
                        skipped += 1;
                    }
                }
            }

            tracing::debug!("Class '{}': {} images", label, loaded);
        }

        if samples.is_empty() {
            bail!(
                "No images could be loaded from dataset at '{}' ({} files skipped)",
                root.display(),
                skipped
            );
        }

        tracing::info!(
            "Loaded {} images from '{}' ({} skipped)",
            samples.len(),
            root.display(),
            skipped
        );
        Ok(samples)
    }
}

/// Directory entries sorted by path
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Cannot list directory '{}'", dir.display()))?;

    entries.sort();
    Ok(entries)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    /// Write `count` small PNGs into root/<class>/ with mixed sizes and colour types
    pub(crate) fn write_class(root: &Path, class: &str, count: usize) {
        let dir = root.join(class);
        fs::create_dir_all(&dir).unwrap();

        for i in 0..count {
            let path = dir.join(format!("{class}_{i:03}.png"));
            if i % 2 == 0 {
                let size = 20 + i as u32 * 3;
                GrayImage::from_fn(size, size, |x, y| Luma([((x + y + i as u32) * 5 % 256) as u8]))
                    .save(&path)
                    .unwrap();
            } else {
                RgbImage::from_fn(64, 40, |x, _| Rgb([(x * 4 % 256) as u8, 30, (i * 20 % 256) as u8]))
                    .save(&path)
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_loads_every_class_with_lowercased_labels() {
        let tmp = tempfile::tempdir().unwrap();
        write_class(tmp.path(), "Happy", 3);
        write_class(tmp.path(), "sad", 2);

        let samples = ImageFolderLoader::default().load_all(tmp.path()).unwrap();

        assert_eq!(samples.len(), 5);
        assert_eq!(samples.iter().filter(|s| s.label == "happy").count(), 3);
        assert_eq!(samples.iter().filter(|s| s.label == "sad").count(), 2);
    }

    #[test]
    fn test_every_sample_is_normalised_48_by_48() {
        let tmp = tempfile::tempdir().unwrap();
        write_class(tmp.path(), "angry", 4);

        for s in ImageFolderLoader::default().load_all(tmp.path()).unwrap() {
            assert_eq!(s.pixels.len(), 48 * 48);
            assert!(s.pixels.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_class(tmp.path(), "happy", 6);
        fs::write(tmp.path().join("happy").join("broken.png"), b"\x89PNG garbage").unwrap();

        let files_in_dir = fs::read_dir(tmp.path().join("happy")).unwrap().count();
        let samples      = ImageFolderLoader::default().load_all(tmp.path()).unwrap();

        assert_eq!(samples.len(), files_in_dir - 1);
    }

    #[test]
    fn test_root_level_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_class(tmp.path(), "sad", 2);
        fs::write(tmp.path().join("README.txt"), "not a class").unwrap();

        let samples = ImageFolderLoader::default().load_all(tmp.path()).unwrap();
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_no_decodable_images_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("happy")).unwrap();
        fs::write(tmp.path().join("happy").join("a.png"), b"nope").unwrap();

        let err = ImageFolderLoader::default().load_all(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("No images could be loaded"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        assert!(ImageFolderLoader::default().load_all(&missing).is_err());
    }
}
