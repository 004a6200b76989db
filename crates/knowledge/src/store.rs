//! Read-only passage record store backed by a JSONL file.

use crate::types::Passage;
use physrag_core::{AppError, AppResult};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Passages keyed by row id (line number in the JSONL file).
#[derive(Debug, Clone, Default)]
pub struct PassageStore {
    passages: Vec<Passage>,
}

impl PassageStore {
    /// Build a store from passages already in row-id order.
    pub fn from_passages(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    /// Load a store from `passages.jsonl`.
    ///
    /// Blank lines are not allowed: every line is one row.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Passage store not found at {:?}. Run 'physrag ingest' first.",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read passage store {:?}: {}", path, e))
        })?;

        let passages = content
            .lines()
            .enumerate()
            .map(|(row, line)| {
                serde_json::from_str::<Passage>(line).map_err(|e| {
                    AppError::Config(format!(
                        "Invalid passage record at row {} in {:?}: {}",
                        row, path, e
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!("Loaded {} passages from {:?}", passages.len(), path);
        Ok(Self { passages })
    }

    /// Write passages as JSONL, one record per line.
    pub fn write(path: &Path, passages: &[Passage]) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(fs::File::create(path)?);
        for passage in passages {
            serde_json::to_writer(&mut writer, passage)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Look up a passage by row id.
    pub fn get(&self, row_id: usize) -> Option<&Passage> {
        self.passages.get(row_id)
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Distinct source names in first-seen order.
    pub fn sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.passages
            .iter()
            .filter(|p| seen.insert(p.source.as_str()))
            .map(|p| p.source.clone())
            .collect()
    }
}
