//! Vector index abstraction for corpus passages.
//!
//! The index is built offline and never mutated at query time, so the trait
//! only exposes lookups.

use physrag_core::AppResult;

/// Trait for read-only nearest-neighbor index backends.
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` `(distance, row_id)` pairs, ascending by distance.
    ///
    /// A query whose length differs from `dimensions()` is a retrieval error.
    fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(f32, usize)>>;

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    /// Vector dimensionality.
    fn dimensions(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
