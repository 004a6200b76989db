//! Corpus file layout and manifest persistence.

use crate::types::CorpusManifest;
use physrag_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the record store path.
pub fn get_passages_path(data_dir: &Path) -> PathBuf {
    data_dir.join("passages.jsonl")
}

/// Get the SQLite vector index path.
pub fn get_index_path(data_dir: &Path) -> PathBuf {
    data_dir.join("index.sqlite")
}

/// Get the manifest path.
pub fn get_manifest_path(data_dir: &Path) -> PathBuf {
    data_dir.join("manifest.yaml")
}

/// Load the corpus manifest.
pub fn load_manifest(data_dir: &Path) -> AppResult<CorpusManifest> {
    let path = get_manifest_path(data_dir);

    if !path.exists() {
        return Err(AppError::Config(format!(
            "Corpus manifest not found at {:?}. Run 'physrag ingest' first.",
            path
        )));
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("Failed to read manifest at {:?}: {}", path, e)))?;

    let manifest: CorpusManifest = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse manifest at {:?}: {}", path, e)))?;

    tracing::debug!("Loaded corpus manifest from {:?}", path);
    Ok(manifest)
}

/// Save the corpus manifest.
pub fn save_manifest(data_dir: &Path, manifest: &CorpusManifest) -> AppResult<()> {
    fs::create_dir_all(data_dir)?;

    let path = get_manifest_path(data_dir);
    let yaml = serde_yaml::to_string(manifest)?;

    fs::write(&path, yaml)
        .map_err(|e| AppError::Config(format!("Failed to write manifest to {:?}: {}", path, e)))?;

    tracing::debug!("Saved corpus manifest to {:?}", path);
    Ok(())
}

/// Calculate the SHA-256 of a file's bytes.
pub fn file_sha256(path: &Path) -> AppResult<String> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
