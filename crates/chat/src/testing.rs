//! Test doubles shared by the chat modules.

use physrag_core::{AppError, AppResult};
use physrag_knowledge::embeddings::providers::TrigramProvider;
use physrag_knowledge::{EmbeddingProvider, FlatL2Index, Passage, PassageStore, Retriever};
use physrag_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Completion client that replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedClient {
    pub fn new(replies: impl IntoIterator<Item = AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(t.to_string())))
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Completion("script exhausted".to_string())))?;

        Ok(LlmResponse {
            content: reply,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
        })
    }
}

/// Small physics corpus covering every task type.
pub fn physics_passages() -> Vec<Passage> {
    vec![
        Passage::new(
            "ATLAS_mass.pdf",
            "ATLAS measured the Higgs boson mass 125.11 GeV with uncertainty 0.11 GeV",
        ),
        Passage::new(
            "CMS_mass.pdf",
            "CMS measured the Higgs boson mass 125.08 GeV in the four-lepton channel",
        ),
        Passage::new(
            "ATLAS_mu.pdf",
            "The signal strength of the Higgs boson with mass 125 GeV is 1.05",
        ),
        Passage::new(
            "lineshape_a.pdf",
            "The Breit-Wigner resonance lineshape depends on the width Gamma",
        ),
        Passage::new(
            "lineshape_b.pdf",
            "A resonance width Gamma broadens the Breit-Wigner peak",
        ),
        Passage::new(
            "lineshape_c.pdf",
            "Plot of the resonance width and Breit-Wigner propagator",
        ),
        Passage::new(
            "lineshape_d.pdf",
            "Breit-Wigner resonance width Gamma from the propagator pole",
        ),
        Passage::new(
            "vacuum.pdf",
            "Vacuum stability of the Higgs potential depends on the top Yukawa",
        ),
    ]
}

/// Retriever over `passages` with a trigram embedder and flat index.
pub async fn retriever(passages: Vec<Passage>) -> Retriever {
    let embedder = Arc::new(TrigramProvider::new(128));
    let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
    let vectors = embedder.embed_batch(&texts).await.unwrap();

    Retriever::new(
        embedder,
        Arc::new(FlatL2Index::from_vectors(128, vectors).unwrap()),
        Arc::new(PassageStore::from_passages(passages)),
    )
}
