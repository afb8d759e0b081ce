//! Offline hashing embedding provider.
//!
//! Lower-cases the text, splits it into alphanumeric words, and counts each word in
//! one of `dimensions` buckets chosen by an FNV-1a hash. The counts are
//! L2-normalized. Texts sharing vocabulary land close together, which is enough for
//! local runs and tests without network access.

use async_trait::async_trait;

use super::{l2_normalize, EmbeddingProvider};
use crate::error::ProviderError;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(dimensions: usize) -> Result<Self, ProviderError> {
        if dimensions == 0 {
            return Err(ProviderError::Config(
                "hash provider needs at least one dimension".into(),
            ));
        }
        Ok(Self { dimensions })
    }

    fn bucket(&self, word: &str) -> usize {
        let hash = word.bytes().fold(FNV_OFFSET, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        });
        (hash % self.dimensions as u64) as usize
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut counts = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            counts[self.bucket(&word.to_lowercase())] += 1.0;
        }
        l2_normalize(&counts)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.vectorize(text))
    }

    fn name(&self) -> &str {
        "hash"
    }
}
