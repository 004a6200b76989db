//! Offline corpus construction from plain-text documents.
//!
//! Produces the three files `Corpus::open` expects: the JSONL passage store,
//! the SQLite vector index and the manifest.

use crate::config::{file_sha256, get_index_path, get_passages_path, save_manifest};
use crate::embeddings::EmbeddingProvider;
use crate::index::write_index;
use crate::store::PassageStore;
use crate::types::{CorpusManifest, IngestStats, ManifestEmbedding, Passage};
use chrono::Utc;
use physrag_core::{AppError, AppResult};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;
use text_splitter::{ChunkConfig, TextSplitter};
use walkdir::WalkDir;

/// Window size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Overlap between consecutive windows in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Texts embedded per provider call.
const EMBED_BATCH_SIZE: usize = 64;

static REFERENCES_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\nreferences.*").expect("valid references regex"));

/// Windowing parameters.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Drop everything from a line starting with "references" to the end.
pub fn strip_references(text: &str) -> String {
    REFERENCES_SECTION.replace(text, "").into_owned()
}

/// Split a document into trimmed, non-empty overlapping windows.
pub fn split_windows(text: &str, options: &IngestOptions) -> AppResult<Vec<String>> {
    let config = ChunkConfig::new(options.chunk_size)
        .with_overlap(options.chunk_overlap)
        .map_err(|e| AppError::Config(format!("Invalid chunk settings: {}", e)))?;
    let splitter = TextSplitter::new(config);

    Ok(splitter
        .chunks(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect())
}

/// Collect passages from every supported document under `input`.
///
/// Files are visited in name order so row ids are reproducible.
pub fn collect_passages(
    input: &Path,
    options: &IngestOptions,
) -> AppResult<(Vec<Passage>, IngestStats)> {
    let mut stats = IngestStats {
        sources_count: 0,
        skipped_count: 0,
        passages_count: 0,
        bytes_processed: 0,
        duration_secs: 0.0,
    };
    let mut passages = Vec::new();

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| AppError::Io(e.into()))?;
        if !entry.file_type().is_file() || !is_supported(entry.path()) {
            continue;
        }

        let source = entry.file_name().to_string_lossy().to_string();
        let text = std::fs::read_to_string(entry.path())?;
        stats.bytes_processed += text.len() as u64;

        let body = strip_references(&text);
        if body.trim().is_empty() {
            tracing::warn!("Skipping {}: no text before references", source);
            stats.skipped_count += 1;
            continue;
        }

        let windows = split_windows(&body, options)?;
        tracing::debug!("{}: {} windows", source, windows.len());

        stats.sources_count += 1;
        passages.extend(windows.into_iter().map(|w| Passage::new(source.clone(), w)));
    }

    stats.passages_count = passages.len() as u32;
    Ok((passages, stats))
}

/// Build a corpus in `data_dir` from the documents under `input`.
pub async fn ingest_directory(
    input: &Path,
    data_dir: &Path,
    embedder: &dyn EmbeddingProvider,
    options: &IngestOptions,
) -> AppResult<IngestStats> {
    let start = Instant::now();

    if !input.is_dir() {
        return Err(AppError::Config(format!(
            "Input directory {:?} does not exist",
            input
        )));
    }

    let (passages, mut stats) = collect_passages(input, options)?;
    if passages.is_empty() {
        return Err(AppError::Config(format!(
            "No passages found under {:?} (supported: .txt, .md)",
            input
        )));
    }

    tracing::info!(
        "Embedding {} passages from {} documents with {} ({})",
        passages.len(),
        stats.sources_count,
        embedder.provider_name(),
        embedder.model_name()
    );

    let mut vectors = Vec::with_capacity(passages.len());
    for batch in passages.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
        vectors.extend(embedder.embed_batch(&texts).await?);
    }

    let passages_path = get_passages_path(data_dir);
    PassageStore::write(&passages_path, &passages)?;
    write_index(&get_index_path(data_dir), &vectors)?;

    let manifest = CorpusManifest {
        embedding: ManifestEmbedding {
            provider: embedder.provider_name().to_string(),
            model: embedder.model_name().to_string(),
            dimensions: embedder.dimensions(),
        },
        passage_count: passages.len(),
        chunk_size: options.chunk_size,
        chunk_overlap: options.chunk_overlap,
        passages_sha256: file_sha256(&passages_path)?,
        created_at: Utc::now(),
    };
    save_manifest(data_dir, &manifest)?;

    stats.duration_secs = start.elapsed().as_secs_f64();
    tracing::info!(
        "Ingested {} passages in {:.2}s",
        stats.passages_count,
        stats.duration_secs
    );

    Ok(stats)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
