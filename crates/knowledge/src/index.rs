//! SQLite-persisted flat L2 vector index.
//!
//! Vectors are stored as little-endian f32 blobs keyed by row id and loaded
//! into memory once; search is exhaustive squared-L2.

use crate::vector_index::VectorIndex;
use physrag_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::path::Path;

/// Initialize the SQLite index database.
pub fn init_index(db_path: &Path) -> AppResult<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Config(format!("Failed to open SQLite index: {}", e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS vectors (
            row_id INTEGER PRIMARY KEY,
            embedding BLOB NOT NULL
        );
        "#,
    )
    .map_err(|e| AppError::Config(format!("Failed to create tables: {}", e)))?;

    tracing::debug!("Initialized SQLite index at {:?}", db_path);
    Ok(conn)
}

/// Insert a vector under a row id.
pub fn insert_vector(conn: &Connection, row_id: usize, embedding: &[f32]) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO vectors (row_id, embedding) VALUES (?1, ?2)",
        params![row_id as i64, embedding_to_bytes(embedding)],
    )
    .map_err(|e| AppError::Config(format!("Failed to insert vector {}: {}", row_id, e)))?;

    Ok(())
}

/// Replace the index at `db_path` with the given vectors (row id = position).
pub fn write_index(db_path: &Path, vectors: &[Vec<f32>]) -> AppResult<()> {
    if db_path.exists() {
        std::fs::remove_file(db_path)?;
    }

    let mut conn = init_index(db_path)?;
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Config(format!("Failed to begin transaction: {}", e)))?;

    for (row_id, embedding) in vectors.iter().enumerate() {
        insert_vector(&tx, row_id, embedding)?;
    }

    tx.commit()
        .map_err(|e| AppError::Config(format!("Failed to commit index: {}", e)))?;

    tracing::info!("Wrote {} vectors to {:?}", vectors.len(), db_path);
    Ok(())
}

/// In-memory exhaustive L2 index.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    /// Build an index from vectors in row-id order.
    pub fn from_vectors(dimensions: usize, vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        if let Some((row_id, v)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(AppError::Config(format!(
                "Vector {} has {} dimensions, expected {}",
                row_id,
                v.len(),
                dimensions
            )));
        }

        Ok(Self {
            dimensions,
            vectors,
        })
    }

    /// Load all vectors from SQLite.
    ///
    /// Row ids must be exactly `0..n`.
    pub fn load(db_path: &Path, dimensions: usize) -> AppResult<Self> {
        if !db_path.exists() {
            return Err(AppError::Config(format!(
                "Vector index not found at {:?}. Run 'physrag ingest' first.",
                db_path
            )));
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Config(format!("Failed to open SQLite index: {}", e)))?;

        let mut stmt = conn
            .prepare("SELECT row_id, embedding FROM vectors ORDER BY row_id")
            .map_err(|e| AppError::Config(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(|e| AppError::Config(format!("Failed to query vectors: {}", e)))?;

        let mut vectors = Vec::new();
        for (expected, row) in rows.enumerate() {
            let (row_id, bytes) =
                row.map_err(|e| AppError::Config(format!("Failed to read vector: {}", e)))?;

            if row_id != expected as i64 {
                return Err(AppError::Config(format!(
                    "Vector index row ids are not contiguous: expected {}, found {}",
                    expected, row_id
                )));
            }

            vectors.push(bytes_to_embedding(&bytes)?);
        }

        let index = Self::from_vectors(dimensions, vectors)?;
        tracing::info!(
            "Loaded {} vectors ({} dims) from {:?}",
            index.len(),
            dimensions,
            db_path
        );
        Ok(index)
    }
}

impl VectorIndex for FlatL2Index {
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(f32, usize)>> {
        if query.len() != self.dimensions {
            return Err(AppError::Retrieval(format!(
                "Query vector has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(row_id, v)| (squared_l2(query, v), row_id))
            .collect();

        // Stable sort keeps lower row ids first on ties.
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.truncate(k);

        tracing::debug!("Retrieved {} vectors (requested top-{})", hits.len(), k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Convert embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Config(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
