//! Semantic search over a small, fixed event catalog.
//!
//! At startup every catalog item is embedded once (its description followed by its
//! tags) and loaded into an exact, brute-force vector index. Each query is embedded
//! and answered with the `k` nearest items by squared Euclidean distance, nearest
//! first, ties broken by catalog order.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`catalog`] — Catalog items and the built-in event list
//! - [`embedding`] — Embedding providers (Gemini API, offline hashing)
//! - [`error`] — Typed errors for providers, the index, search, and startup
//! - [`index`] — Exact k-nearest-neighbor vector index
//! - [`search`] — Search service: catalog indexing and query answering
//! - [`server`] — `POST /search` HTTP endpoint

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod search;
pub mod server;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::search::{SearchService, ServiceOptions};

/// Load the configured catalog and provider, then build a ready [`SearchService`].
pub async fn build_service(config: &AppConfig) -> Result<SearchService> {
    let catalog = match config.resolved_catalog_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog file");
            catalog::load(&path)?
        }
        None => catalog::builtin()?,
    };

    let provider = embedding::create_provider(&config.embedding)?;
    tracing::info!(provider = provider.name(), "embedding provider ready");

    let options = ServiceOptions {
        default_k: config.search.default_k,
        concurrency: config.embedding.concurrency,
    };
    SearchService::initialize(catalog, provider, options)
        .await
        .context("failed to initialize search index")
}
