#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use event_search::catalog::CatalogItem;
use event_search::embedding::EmbeddingProvider;
use event_search::error::ProviderError;
use event_search::search::{SearchService, ServiceOptions};

/// Deterministic provider backed by a text -> vector table.
#[derive(Default)]
pub struct StubProvider {
    vectors: HashMap<String, Vec<f32>>,
    delays: HashMap<String, Duration>,
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Delay the response for `text`, to shuffle completion order.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Fail every call whose text equals `text`.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_on.as_deref() == Some(text) {
            return Err(ProviderError::Status {
                status: 503,
                body: "upstream unavailable".into(),
            });
        }
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| ProviderError::Malformed(format!("no stub vector for {text:?}")))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Build an item with no display fields.
pub fn item(id: i64, description: &str, tags: &[&str]) -> CatalogItem {
    CatalogItem::new(id, description, tags)
}

/// Three items laid out on a line: A at 0, B at 10, C at 20.
/// Combined texts are `"a "`, `"b "`, `"c "`.
pub fn line_catalog() -> (Vec<CatalogItem>, StubProvider) {
    let catalog = vec![item(1, "a", &[]), item(2, "b", &[]), item(3, "c", &[])];
    let provider = StubProvider::new()
        .with("a ", vec![0.0, 0.0])
        .with("b ", vec![10.0, 0.0])
        .with("c ", vec![20.0, 0.0]);
    (catalog, provider)
}

pub async fn ready_service(
    catalog: Vec<CatalogItem>,
    provider: Arc<StubProvider>,
) -> SearchService {
    SearchService::initialize(catalog, provider, ServiceOptions::default())
        .await
        .unwrap()
}

pub fn ids(items: &[&CatalogItem]) -> Vec<i64> {
    items.iter().map(|i| i.id()).collect()
}
