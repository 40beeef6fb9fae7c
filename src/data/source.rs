// ============================================================
// Layer 4 — Dataset Sources
// ============================================================
// Makes the labelled image dataset available on local disk.
//
// Two implementations of the DatasetSource trait:
//
//   LocalDatasetSource
//     The dataset is already on disk; just check it exists.
//
//   KaggleDatasetSource
//     Downloads a Kaggle dataset archive once and caches the
//     extracted files:
//
//       <cache>/datasets/<owner>/<slug>/
//         archive.zip    ← removed after a successful extract
//         files/         ← extracted dataset, returned to caller
//
//     If files/ already exists the call is a cache hit and no
//     network I/O happens. Extraction goes into files.partial/
//     first and is renamed into place, so an interrupted run
//     never leaves a half-extracted files/ behind.
//
// Cache directory resolution order:
//   1. explicit cache_dir from the config
//   2. $EMOTION_TRAINER_CACHE
//   3. platform cache dir (dirs::cache_dir)/emotion-trainer
//   4. ~/.cache/emotion-trainer
//   5. system temp dir/emotion-trainer
//
// Credentials (optional, public datasets download anonymously):
//   $KAGGLE_USERNAME + $KAGGLE_KEY, else ~/.kaggle/kaggle.json
//
// Reference: reqwest::blocking and zip crate documentation

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::domain::traits::DatasetSource;

/// The dataset the emotion classifier is trained on by default
pub const DEFAULT_DATASET: &str = "ananthu017/emotion-detection-fer";

const KAGGLE_DOWNLOAD_URL: &str = "https://www.kaggle.com/api/v1/datasets/download";
const CACHE_ENV: &str = "EMOTION_TRAINER_CACHE";
const APP_DIR: &str = "emotion-trainer";

// ─── DatasetHandle ────────────────────────────────────────────────────────────
/// A validated "owner/slug" dataset identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    pub owner: String,
    pub slug:  String,
}

impl DatasetHandle {
    pub fn parse(handle: &str) -> Result<Self> {
        let mut parts = handle.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(slug), None) if !owner.is_empty() && !slug.is_empty() => Ok(Self {
                owner: owner.to_string(),
                slug:  slug.to_string(),
            }),
            _ => bail!("Invalid dataset handle '{handle}', expected 'owner/dataset'"),
        }
    }

    pub fn download_url(&self) -> String {
        format!("{KAGGLE_DOWNLOAD_URL}/{}/{}", self.owner, self.slug)
    }
}

impl fmt::Display for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

// ─── LocalDatasetSource ───────────────────────────────────────────────────────
pub struct LocalDatasetSource {
    root: PathBuf,
}

impl LocalDatasetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for LocalDatasetSource {
    fn resolve(&self) -> Result<PathBuf> {
        if !self.root.is_dir() {
            bail!("Dataset directory '{}' does not exist", self.root.display());
        }
        Ok(self.root.clone())
    }
}

// ─── KaggleDatasetSource ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
struct KaggleCredentials {
    username: String,
    key:      String,
}

pub struct KaggleDatasetSource {
    handle:    DatasetHandle,
    cache_dir: PathBuf,
}

impl KaggleDatasetSource {
    /// Create a source, resolving the cache dir if none is given
    pub fn new(handle: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            handle:    DatasetHandle::parse(handle)?,
            cache_dir: cache_dir.unwrap_or_else(default_cache_dir),
        })
    }

    /// Directory holding this dataset's download and extracted files
    pub fn dataset_dir(&self) -> PathBuf {
        self.cache_dir
            .join("datasets")
            .join(&self.handle.owner)
            .join(&self.handle.slug)
    }

    /// Where the extracted dataset lives once downloaded
    pub fn files_dir(&self) -> PathBuf {
        self.dataset_dir().join("files")
    }

    fn download(&self, archive: &Path) -> Result<()> {
        let url = self.handle.download_url();
        tracing::info!("Downloading dataset {} from {}", self.handle, url);

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("emotion-trainer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()
            .context("Failed to create HTTP client")?;

        let mut request = client.get(&url);
        if let Some(creds) = kaggle_credentials() {
            tracing::debug!("Authenticating as Kaggle user '{}'", creds.username);
            request = request.basic_auth(creds.username, Some(creds.key));
        }

        let mut response = request
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to download dataset '{}'", self.handle))?;

        let mut file = fs::File::create(archive)
            .with_context(|| format!("Cannot create '{}'", archive.display()))?;
        let bytes = response
            .copy_to(&mut file)
            .with_context(|| format!("Failed while downloading dataset '{}'", self.handle))?;

        tracing::info!("Downloaded {} bytes to '{}'", bytes, archive.display());
        Ok(())
    }
}

impl DatasetSource for KaggleDatasetSource {
    fn resolve(&self) -> Result<PathBuf> {
        let files = self.files_dir();
        if files.is_dir() {
            tracing::debug!("Dataset {} found in cache at '{}'", self.handle, files.display());
            return Ok(files);
        }

        let dir = self.dataset_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create cache directory '{}'", dir.display()))?;

        let archive = dir.join("archive.zip");
        self.download(&archive)?;
        extract_archive(&archive, &files)?;
        fs::remove_file(&archive).ok();

        tracing::info!("Dataset {} ready at '{}'", self.handle, files.display());
        Ok(files)
    }
}

/// Extract a zip archive into `dest` via a staging directory
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let staging = dest.with_extension("partial");
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("Cannot clear stale '{}'", staging.display()))?;
    }

    let file = fs::File::open(archive)
        .with_context(|| format!("Cannot open archive '{}'", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("'{}' is not a valid zip archive", archive.display()))?;
    zip.extract(&staging)
        .with_context(|| format!("Cannot extract '{}'", archive.display()))?;

    fs::rename(&staging, dest)
        .with_context(|| format!("Cannot move extracted dataset to '{}'", dest.display()))?;
    Ok(())
}

/// Resolve where downloaded datasets are cached
pub fn default_cache_dir() -> PathBuf {
    if let Ok(path) = env::var(CACHE_ENV) {
        return PathBuf::from(path);
    }
    if let Some(cache_dir) = dirs::cache_dir() {
        return cache_dir.join(APP_DIR);
    }
    if let Some(home_dir) = dirs::home_dir() {
        return home_dir.join(".cache").join(APP_DIR);
    }
    env::temp_dir().join(APP_DIR)
}

fn kaggle_credentials() -> Option<KaggleCredentials> {
    if let (Ok(username), Ok(key)) = (env::var("KAGGLE_USERNAME"), env::var("KAGGLE_KEY")) {
        return Some(KaggleCredentials { username, key });
    }

    let path = dirs::home_dir()?.join(".kaggle").join("kaggle.json");
    let json = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&json) {
        Ok(creds) => Some(creds),
        Err(e) => {
            tracing::warn!("Ignoring unreadable '{}': {}", path.display(), e);
            None
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_handle() {
        let h = DatasetHandle::parse(DEFAULT_DATASET).unwrap();
        assert_eq!(h.owner, "ananthu017");
        assert_eq!(h.slug,  "emotion-detection-fer");
        assert_eq!(h.to_string(), DEFAULT_DATASET);
        assert!(h.download_url().ends_with("/ananthu017/emotion-detection-fer"));
    }

    #[test]
    fn test_malformed_handles_are_rejected() {
        for bad in ["", "owner", "owner/", "/slug", "a/b/c"] {
            assert!(DatasetHandle::parse(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn test_cached_dataset_needs_no_network() {
        let tmp    = tempfile::tempdir().unwrap();
        let source = KaggleDatasetSource::new("someone/faces", Some(tmp.path().to_path_buf())).unwrap();
        fs::create_dir_all(source.files_dir().join("happy")).unwrap();

        let first  = source.resolve().unwrap();
        let second = source.resolve().unwrap();
        assert_eq!(first, source.files_dir());
        assert_eq!(first, second);
    }

    #[test]
    fn test_local_source_requires_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(LocalDatasetSource::new(tmp.path()).resolve().unwrap(), tmp.path());
        assert!(LocalDatasetSource::new(tmp.path().join("missing")).resolve().is_err());
    }

    #[test]
    fn test_extract_archive_moves_files_into_place() {
        let tmp     = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("archive.zip");

        {
            let file    = fs::File::create(&archive).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("train/happy/a.txt", options).unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }

        let dest = tmp.path().join("files");
        extract_archive(&archive, &dest).unwrap();

        assert!(dest.join("train").join("happy").join("a.txt").is_file());
        assert!(!tmp.path().join("files.partial").exists());
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let tmp     = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("archive.zip");
        fs::write(&archive, b"not a zip").unwrap();

        assert!(extract_archive(&archive, &tmp.path().join("files")).is_err());
    }
}
