//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use physrag_core::config::EmbeddingSettings;
use serde::{Deserialize, Serialize};

/// An indexed text window from the corpus.
///
/// Loaded once at startup; the row id is the passage's line number in the
/// record store and its key in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Originating document identifier (file name)
    pub source: String,

    /// Raw window text
    pub text: String,
}

impl Passage {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Result from a nearest-neighbor retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Retrieved passages, ascending by distance
    pub passages: Vec<Passage>,

    /// Squared L2 distances, parallel to `passages`
    pub distances: Vec<f32>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Embedding identity recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEmbedding {
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
}

impl From<&EmbeddingSettings> for ManifestEmbedding {
    fn from(settings: &EmbeddingSettings) -> Self {
        Self {
            provider: settings.provider.clone(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
        }
    }
}

/// Description of a built corpus, written next to the index by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub embedding: ManifestEmbedding,

    #[serde(rename = "passageCount")]
    pub passage_count: usize,

    #[serde(rename = "chunkSize")]
    pub chunk_size: usize,

    #[serde(rename = "chunkOverlap")]
    pub chunk_overlap: usize,

    /// SHA-256 of passages.jsonl
    #[serde(rename = "passagesSha256")]
    pub passages_sha256: String,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Statistics from an ingest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Documents that produced at least one passage
    pub sources_count: u32,

    /// Documents skipped because nothing survived reference stripping
    pub skipped_count: u32,

    /// Passages written
    pub passages_count: u32,

    /// Total bytes read
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}

/// Summary of a loaded corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    pub passages_count: usize,
    pub sources: Vec<String>,
    pub embedding: ManifestEmbedding,
    pub created_at: DateTime<Utc>,
}
