//! Text-to-vector embedding providers.
//!
//! Provides the [`EmbeddingProvider`] trait, a remote Gemini implementation, and a
//! deterministic offline hashing implementation. The provider is created via
//! [`create_provider`] from configuration.

pub mod gemini;
pub mod hash;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::EmbeddingConfig;
use crate::error::ProviderError;

/// Trait for embedding text into vectors.
///
/// Implementations must be safe to call concurrently. Output for identical text is
/// not required to be bit-identical across calls.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector. Never returns an empty vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Create an embedding provider from config.
///
/// Supported: `"gemini"` (remote API) and `"hash"` (offline, deterministic).
pub fn create_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(gemini::GeminiEmbeddingProvider::new(config)?)),
        "hash" => Ok(Arc::new(hash::HashEmbeddingProvider::new(config.dimensions)?)),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: gemini, hash"),
    }
}

/// L2-normalize a vector. Returns a zero vector if the input norm is zero.
pub(crate) fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
