//! Semantic index selection and the per-invocation service context.

use crate::config::Config;
use crate::error::Result;
use credence_belief::{BeliefConfig, BeliefController};
use credence_domain::traits::{ClaimIndex, ClaimStore, LlmProvider, Retriever};
use credence_domain::{IndexedClaim, RetrievalHit, StatusFilter};
use credence_extractor::{Extractor, Ingestor};
use credence_llm::ChatCompletionProvider;
use credence_orchestrator::Orchestrator;
use credence_retrieval::embedding::HashedEmbedding;
use credence_retrieval::{HttpRetriever, LocalIndex, RetrievalError};
use credence_store::SqliteStore;
use credence_synthesizer::Synthesizer;
use std::sync::Arc;
use tracing::info;

/// The semantic index this invocation talks to
pub enum RetrieverBackend {
    /// In-process HNSW index, loaded from the store on demand
    Local(LocalIndex<HashedEmbedding>),
    /// External index service
    Http(HttpRetriever),
}

impl RetrieverBackend {
    /// Pick the backend named by the configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.index_endpoint {
            Some(endpoint) => Ok(Self::Http(HttpRetriever::with_timeout(
                endpoint.clone(),
                config.index_timeout_secs,
            )?)),
            None => Ok(Self::Local(LocalIndex::with_default_embedding())),
        }
    }

    /// Whether the index outlives this process
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Human-readable name for messages
    pub fn label(&self) -> String {
        match self {
            Self::Local(_) => "in-process index".to_string(),
            Self::Http(http) => format!("index at {}", http.endpoint()),
        }
    }

    /// Make the index ready to answer searches.
    ///
    /// The in-process index starts empty every run, so it is filled from the
    /// store first. An external index is used as is.
    pub async fn prepare(&self, store: &SqliteStore) -> Result<()> {
        if let Self::Local(_) = self {
            rebuild_from_store(self, store).await?;
        }
        Ok(())
    }
}

impl Retriever for RetrieverBackend {
    type Error = RetrievalError;

    async fn retrieve(&self, query: &str, top_k: usize) -> std::result::Result<Vec<RetrievalHit>, Self::Error> {
        match self {
            Self::Local(index) => index.retrieve(query, top_k).await,
            Self::Http(http) => http.retrieve(query, top_k).await,
        }
    }
}

impl ClaimIndex for RetrieverBackend {
    type Error = RetrievalError;

    async fn rebuild(&self, claims: Vec<IndexedClaim>) -> std::result::Result<usize, Self::Error> {
        match self {
            Self::Local(index) => index.rebuild(claims).await,
            Self::Http(http) => http.rebuild(claims).await,
        }
    }
}

/// Replace the whole index content with every claim in the store.
pub async fn rebuild_from_store(index: &RetrieverBackend, store: &SqliteStore) -> Result<usize> {
    let claims: Vec<IndexedClaim> = store
        .get_by_status(StatusFilter::All)?
        .iter()
        .map(|claim| claim.to_indexed())
        .collect();

    let count = index.rebuild(claims).await?;
    info!("Rebuilt {} with {} claim(s)", index.label(), count);
    Ok(count)
}

/// Services shared by every command
pub struct Context<L: LlmProvider> {
    /// Loaded configuration
    pub config: Config,
    /// The claim store
    pub store: Arc<SqliteStore>,
    /// The semantic index
    pub index: Arc<RetrieverBackend>,
    /// The generation service
    pub llm: Arc<L>,
}

impl Context<ChatCompletionProvider> {
    /// Open the store and build clients from the configuration.
    pub fn open(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(&config.storage_path)?);
        let index = Arc::new(RetrieverBackend::from_config(&config)?);
        let llm = ChatCompletionProvider::new(
            config.generation_endpoint.clone(),
            config.generation_model.clone(),
        )?
        .with_api_token_from_env(&config.api_token_env);

        Ok(Self::new(config, store, index, Arc::new(llm)))
    }
}

impl<L: LlmProvider> Context<L> {
    /// Assemble a context from parts.
    pub fn new(
        config: Config,
        store: Arc<SqliteStore>,
        index: Arc<RetrieverBackend>,
        llm: Arc<L>,
    ) -> Self {
        Self {
            config,
            store,
            index,
            llm,
        }
    }

    /// Claim extractor writing into the store
    pub fn extractor(&self) -> Extractor<L, SqliteStore> {
        Extractor::new(
            Arc::clone(&self.llm),
            Arc::clone(&self.store),
            self.config.extractor.clone(),
        )
    }

    /// Document ingestor
    pub fn ingestor(&self) -> Ingestor<L> {
        Ingestor::new(Arc::clone(&self.llm), &self.config.extractor)
    }

    /// Query pipeline
    pub fn orchestrator(&self) -> Orchestrator<RetrieverBackend, SqliteStore, L> {
        let synthesizer = Synthesizer::new(Arc::clone(&self.llm), self.config.synthesizer());
        Orchestrator::new(
            Arc::clone(&self.index),
            Arc::clone(&self.store),
            synthesizer,
            self.config.orchestrator.clone(),
        )
    }

    /// Review controller using `belief`
    pub fn controller(&self, belief: BeliefConfig) -> BeliefController<SqliteStore> {
        BeliefController::new(Arc::clone(&self.store), belief)
    }
}
