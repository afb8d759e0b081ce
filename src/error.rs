//! Error types for each layer of the search pipeline.
//!
//! Provider and index failures are wrapped by [`SearchError`] at query time and by
//! [`InitializationError`] while the catalog is being indexed.

use thiserror::Error;

/// Failure of the upstream embedding call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("embedding request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("embedding request timed out after {0}s")]
    Timeout(u64),

    #[error("embedding provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),

    #[error("embedding provider returned an empty vector")]
    EmptyEmbedding,

    #[error("no API key configured (set GENAI_API_KEY or embedding.api_key)")]
    MissingApiKey,

    #[error("invalid embedding provider config: {0}")]
    Config(String),
}

/// Raised by [`crate::index::VectorIndex::build`] when stored vectors differ in length.
#[derive(Debug, Error, PartialEq)]
#[error("vector at position {position} has {actual} dimensions, expected {expected}")]
pub struct DimensionMismatch {
    pub position: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Errors raised by [`crate::index::VectorIndex::query`].
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("query vector has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    InvalidArgument(String),
}

/// Errors returned by [`crate::search::SearchService::search`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("query embedding has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<IndexError> for SearchError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            IndexError::InvalidArgument(msg) => Self::InvalidArgument(msg),
        }
    }
}

/// Startup failure. The service is never constructed when this is returned.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("failed to embed catalog item {item_id}: {source}")]
    Embedding {
        item_id: i64,
        #[source]
        source: ProviderError,
    },

    #[error("catalog item {item_id} embedded to {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        item_id: i64,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate catalog item id {0}")]
    DuplicateId(i64),

    #[error("embedding task failed: {0}")]
    Task(String),
}

/// Errors raised while loading a catalog definition.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate catalog item id {0}")]
    DuplicateId(i64),

    #[error("catalog item {0} has an empty description")]
    EmptyDescription(i64),
}
