//! Loading and validating a built corpus.

use crate::config::{file_sha256, get_index_path, get_passages_path, load_manifest};
use crate::index::FlatL2Index;
use crate::store::PassageStore;
use crate::types::{CorpusManifest, CorpusStats, ManifestEmbedding};
use crate::vector_index::VectorIndex;
use physrag_core::config::EmbeddingSettings;
use physrag_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Passage store plus vector index, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Corpus {
    manifest: CorpusManifest,
    store: Arc<PassageStore>,
    index: Arc<FlatL2Index>,
}

impl Corpus {
    /// Open the corpus in `data_dir`.
    ///
    /// Every inconsistency between the manifest, the record store, the index
    /// and the configured embedding is a configuration error.
    pub fn open(data_dir: &Path, expected: &EmbeddingSettings) -> AppResult<Self> {
        let manifest = load_manifest(data_dir)?;

        let expected = ManifestEmbedding::from(expected);
        if manifest.embedding != expected {
            return Err(AppError::Config(format!(
                "Corpus was built with {}/{} ({} dims) but {}/{} ({} dims) is configured. Re-run 'physrag ingest'.",
                manifest.embedding.provider,
                manifest.embedding.model,
                manifest.embedding.dimensions,
                expected.provider,
                expected.model,
                expected.dimensions
            )));
        }

        let passages_path = get_passages_path(data_dir);
        let store = PassageStore::load(&passages_path)?;

        let checksum = file_sha256(&passages_path)?;
        if checksum != manifest.passages_sha256 {
            return Err(AppError::Config(format!(
                "Passage store {:?} does not match the manifest checksum",
                passages_path
            )));
        }

        if store.len() != manifest.passage_count {
            return Err(AppError::Config(format!(
                "Passage store holds {} records but the manifest declares {}",
                store.len(),
                manifest.passage_count
            )));
        }

        let index = FlatL2Index::load(&get_index_path(data_dir), manifest.embedding.dimensions)?;
        if index.len() != store.len() {
            return Err(AppError::Config(format!(
                "Vector index holds {} vectors but the passage store holds {} records",
                index.len(),
                store.len()
            )));
        }

        tracing::info!(
            "Opened corpus at {:?}: {} passages, {} dims",
            data_dir,
            store.len(),
            index.dimensions()
        );

        Ok(Self {
            manifest,
            store: Arc::new(store),
            index: Arc::new(index),
        })
    }

    pub fn manifest(&self) -> &CorpusManifest {
        &self.manifest
    }

    pub fn store(&self) -> Arc<PassageStore> {
        Arc::clone(&self.store)
    }

    pub fn index(&self) -> Arc<dyn VectorIndex> {
        self.index.clone()
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            passages_count: self.store.len(),
            sources: self.store.sources(),
            embedding: self.manifest.embedding.clone(),
            created_at: self.manifest.created_at,
        }
    }
}
