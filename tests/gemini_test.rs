use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use event_search::config::EmbeddingConfig;
use event_search::embedding::gemini::GeminiEmbeddingProvider;
use event_search::embedding::EmbeddingProvider;
use event_search::error::ProviderError;
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Spawn a loopback server answering `embedContent` with `reply`.
async fn spawn_fake_gemini(
    reply: (StatusCode, Value),
    delay: Duration,
) -> (String, Captured) {
    let captured = Captured::default();
    let handler = move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
        let reply = reply.clone();
        async move {
            let key = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            captured.requests.lock().unwrap().push((key, body));
            tokio::time::sleep(delay).await;
            (reply.0, Json(reply.1))
        }
    };
    let app = Router::new()
        .route("/v1beta/models/embedding-001:embedContent", post(handler))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), captured)
}

fn config(base_url: String, timeout_secs: u64) -> EmbeddingConfig {
    EmbeddingConfig {
        provider: "gemini".into(),
        model: "embedding-001".into(),
        api_key: Some("secret".into()),
        base_url,
        timeout_secs,
        ..EmbeddingConfig::default()
    }
}

#[tokio::test]
async fn embeds_via_embed_content() {
    let (base_url, captured) = spawn_fake_gemini(
        (StatusCode::OK, json!({"embedding": {"values": [0.25, -0.5, 1.0]}})),
        Duration::ZERO,
    )
    .await;
    let provider = GeminiEmbeddingProvider::new(&config(base_url, 5)).unwrap();

    let vector = provider.embed("tech conference").await.unwrap();
    assert_eq!(vector, vec![0.25, -0.5, 1.0]);

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (key, body) = &requests[0];
    assert_eq!(key.as_deref(), Some("secret"));
    assert_eq!(body["model"], "models/embedding-001");
    assert_eq!(body["content"]["parts"][0]["text"], "tech conference");
}

#[tokio::test]
async fn error_status_is_reported() {
    let (base_url, _) = spawn_fake_gemini(
        (StatusCode::TOO_MANY_REQUESTS, json!({"error": {"message": "quota exceeded"}})),
        Duration::ZERO,
    )
    .await;
    let provider = GeminiEmbeddingProvider::new(&config(base_url, 5)).unwrap();

    match provider.embed("hi").await {
        Err(ProviderError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_values_are_rejected() {
    let (base_url, _) = spawn_fake_gemini(
        (StatusCode::OK, json!({"embedding": {"values": []}})),
        Duration::ZERO,
    )
    .await;
    let provider = GeminiEmbeddingProvider::new(&config(base_url, 5)).unwrap();

    assert!(matches!(
        provider.embed("hi").await,
        Err(ProviderError::EmptyEmbedding)
    ));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (base_url, _) = spawn_fake_gemini(
        (StatusCode::OK, json!({"embedding": {"values": [1.0]}})),
        Duration::from_secs(3),
    )
    .await;
    let provider = GeminiEmbeddingProvider::new(&config(base_url, 1)).unwrap();

    assert!(matches!(
        provider.embed("hi").await,
        Err(ProviderError::Timeout(1))
    ));
}

#[tokio::test]
async fn unreachable_upstream_is_http_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let provider = GeminiEmbeddingProvider::new(&config(format!("http://{addr}"), 5)).unwrap();

    assert!(matches!(
        provider.embed("hi").await,
        Err(ProviderError::Http(_))
    ));
}
