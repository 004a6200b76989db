//! Embedding plus nearest-neighbor lookup for one question.

use crate::embeddings::EmbeddingProvider;
use crate::store::PassageStore;
use crate::types::RetrievalResult;
use crate::vector_index::VectorIndex;
use physrag_core::{AppError, AppResult};
use std::sync::Arc;

/// Retrieves passages nearest to a question.
///
/// Holds only shared read-only collaborators; no caching, no retry.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    store: Arc<PassageStore>,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        store: Arc<PassageStore>,
    ) -> Self {
        Self {
            embedder,
            index,
            store,
        }
    }

    /// Embed `query` and return up to `k` passages, ascending by distance.
    pub async fn retrieve(&self, query: &str, k: usize) -> AppResult<RetrievalResult> {
        let embedding = self.embedder.embed(query).await.map_err(as_retrieval)?;
        let hits = self.index.search(&embedding, k).map_err(as_retrieval)?;

        let mut result = RetrievalResult::default();
        for (distance, row_id) in hits {
            let passage = self.store.get(row_id).ok_or_else(|| {
                AppError::Retrieval(format!("Index returned unknown row id {}", row_id))
            })?;
            result.passages.push(passage.clone());
            result.distances.push(distance);
        }

        tracing::debug!(
            "Retrieved {} passages (k={}) via {}",
            result.len(),
            k,
            self.embedder.provider_name()
        );

        Ok(result)
    }
}

fn as_retrieval(error: AppError) -> AppError {
    match error {
        AppError::Retrieval(_) => error,
        other => AppError::Retrieval(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;
    use crate::index::FlatL2Index;
    use crate::types::Passage;

    #[derive(Debug)]
    struct FailingEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "none"
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Err(AppError::Other("connection refused".to_string()))
        }
    }

    async fn build(texts: &[(&str, &str)]) -> Retriever {
        let embedder = Arc::new(TrigramProvider::new(64));
        let passages: Vec<Passage> = texts.iter().map(|(s, t)| Passage::new(*s, *t)).collect();
        let strings: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let vectors = embedder.embed_batch(&strings).await.unwrap();

        Retriever::new(
            embedder,
            Arc::new(FlatL2Index::from_vectors(64, vectors).unwrap()),
            Arc::new(PassageStore::from_passages(passages)),
        )
    }

    #[tokio::test]
    async fn test_nearest_passage_first() {
        let retriever = build(&[
            ("a.txt", "vacuum stability of the electroweak potential"),
            ("b.txt", "Higgs boson mass measured in GeV"),
            ("c.txt", "luminosity of the LHC run"),
        ])
        .await;

        let result = retriever.retrieve("Higgs boson mass GeV", 2).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.passages[0].source, "b.txt");
        assert!(result.distances[0] <= result.distances[1]);
    }

    #[tokio::test]
    async fn test_k_larger_than_corpus() {
        let retriever = build(&[("a.txt", "one"), ("b.txt", "two")]).await;
        let result = retriever.retrieve("anything", 8).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_retrieval_error() {
        let retriever = Retriever::new(
            Arc::new(FailingEmbedder),
            Arc::new(FlatL2Index::from_vectors(4, vec![]).unwrap()),
            Arc::new(PassageStore::default()),
        );

        let result = retriever.retrieve("mass", 5).await;
        assert!(matches!(result, Err(AppError::Retrieval(_))));
    }
}
