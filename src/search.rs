//! Search orchestration: index the catalog once, then answer k-nearest queries.
//!
//! A [`SearchService`] only exists in its ready state. [`SearchService::initialize`]
//! embeds every catalog item and builds the [`VectorIndex`]; any failure aborts and
//! no service is returned.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::CatalogItem;
use crate::embedding::EmbeddingProvider;
use crate::error::{InitializationError, ProviderError, SearchError};
use crate::index::VectorIndex;

/// Number of results returned when a query does not specify `k`.
pub const DEFAULT_K: usize = 2;

/// A caller's search request. `k` is signed so non-positive values can be
/// reported instead of silently coerced.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub k: Option<i64>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            k: None,
        }
    }

    pub fn with_k(mut self, k: i64) -> Self {
        self.k = Some(k);
        self
    }
}

/// A result item with its squared distance to the query embedding.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub item: &'a CatalogItem,
    pub distance: f32,
}

/// Tuning knobs for [`SearchService::initialize`].
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub default_k: usize,
    /// Maximum embedding calls in flight while indexing.
    pub concurrency: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            default_k: DEFAULT_K,
            concurrency: 4,
        }
    }
}

pub struct SearchService {
    items: Vec<CatalogItem>,
    index: VectorIndex,
    provider: Arc<dyn EmbeddingProvider>,
    default_k: usize,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("items", &self.items.len())
            .field("dimensions", &self.index.dimensions())
            .field("provider", &self.provider.name())
            .field("default_k", &self.default_k)
            .finish()
    }
}

impl SearchService {
    /// Embed every catalog item (description + tags) and build the index.
    ///
    /// Vectors are assembled in catalog order regardless of completion order.
    pub async fn initialize(
        catalog: Vec<CatalogItem>,
        provider: Arc<dyn EmbeddingProvider>,
        options: ServiceOptions,
    ) -> Result<Self, InitializationError> {
        let mut seen = HashSet::with_capacity(catalog.len());
        if let Some(dup) = catalog.iter().find(|item| !seen.insert(item.id())) {
            return Err(InitializationError::DuplicateId(dup.id()));
        }

        tracing::info!(
            items = catalog.len(),
            provider = provider.name(),
            concurrency = options.concurrency,
            "embedding catalog"
        );

        let vectors = embed_catalog(&catalog, &provider, options.concurrency.max(1)).await?;

        let index = VectorIndex::build(vectors).map_err(|err| {
            InitializationError::DimensionMismatch {
                item_id: catalog[err.position].id(),
                expected: err.expected,
                actual: err.actual,
            }
        })?;

        tracing::info!(
            items = index.len(),
            dimensions = index.dimensions(),
            "search index ready"
        );

        Ok(Self {
            items: catalog,
            index,
            provider,
            default_k: options.default_k.max(1),
        })
    }

    /// Return the `min(k, catalog size)` items nearest to the query, nearest first.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<&CatalogItem>, SearchError> {
        Ok(self
            .search_scored(query)
            .await?
            .into_iter()
            .map(|hit| hit.item)
            .collect())
    }

    /// Like [`search`](Self::search) but keeps each item's distance.
    pub async fn search_scored(&self, query: &SearchQuery) -> Result<Vec<SearchHit<'_>>, SearchError> {
        if query.text.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "Query parameter is required".into(),
            ));
        }
        let k = self.resolve_k(query.k)?;

        if self.index.is_empty() {
            tracing::debug!("search against empty index");
            return Ok(Vec::new());
        }

        // Queries are embedded as-is; tags only enrich catalog items.
        let vector = self.provider.embed(&query.text).await.map_err(|e| {
            tracing::warn!(error = %e, "query embedding failed");
            e
        })?;
        if vector.is_empty() {
            return Err(ProviderError::EmptyEmbedding.into());
        }

        let neighbors = self.index.query(&vector, k)?;
        let hits: Vec<SearchHit<'_>> = neighbors
            .into_iter()
            .map(|n| SearchHit {
                item: &self.items[n.position],
                distance: n.distance,
            })
            .collect();

        tracing::info!(
            query_len = query.text.len(),
            k,
            results = hits.len(),
            "search completed"
        );

        Ok(hits)
    }

    fn resolve_k(&self, k: Option<i64>) -> Result<usize, SearchError> {
        match k {
            None => Ok(self.default_k),
            Some(k) if k > 0 => Ok(usize::try_from(k).unwrap_or(usize::MAX)),
            Some(k) => Err(SearchError::InvalidArgument(format!(
                "k must be a positive integer, got {k}"
            ))),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }
}

/// Embed items with bounded parallelism, returning vectors in catalog order.
async fn embed_catalog(
    catalog: &[CatalogItem],
    provider: &Arc<dyn EmbeddingProvider>,
    concurrency: usize,
) -> Result<Vec<Vec<f32>>, InitializationError> {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (position, item) in catalog.iter().enumerate() {
        let provider = Arc::clone(provider);
        let permits = Arc::clone(&permits);
        let item_id = item.id();
        let text = item.combined_text();
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| InitializationError::Task(e.to_string()))?;
            tracing::debug!(item_id, "embedding catalog item");
            let vector = provider
                .embed(&text)
                .await
                .and_then(|v| {
                    if v.is_empty() {
                        Err(ProviderError::EmptyEmbedding)
                    } else {
                        Ok(v)
                    }
                })
                .map_err(|source| InitializationError::Embedding { item_id, source })?;
            Ok::<_, InitializationError>((position, vector))
        });
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; catalog.len()];
    while let Some(joined) = tasks.join_next().await {
        let (position, vector) = match joined {
            Ok(Ok(done)) => done,
            Ok(Err(err)) => {
                tracing::error!(error = %err, "catalog embedding failed");
                tasks.abort_all();
                return Err(err);
            }
            Err(join_err) => {
                tasks.abort_all();
                return Err(InitializationError::Task(join_err.to_string()));
            }
        };
        slots[position] = Some(vector);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(position, slot)| {
            slot.ok_or_else(|| {
                InitializationError::Task(format!(
                    "no embedding produced for catalog item {}",
                    catalog[position].id()
                ))
            })
        })
        .collect()
}
