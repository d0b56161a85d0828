use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use bytes::Bytes;
use futures::StreamExt;
use object_store::memory::InMemory;
use remote_object_store::{
    LogicalPath, SourceErrorPolicy, Storage, StorageBuilder, StorageError, StoreConfig,
};

const BUFFER_SIZE: usize = 8 * 1024;

fn config_with_cdn(cdn_base: String) -> StoreConfig {
    StoreConfig {
        access_key: "test-access".to_string(),
        secret_key: "test-secret".to_string(),
        host: "localhost:9000".to_string(),
        bucket: "media".to_string(),
        root_path: "/".to_string(),
        cdn_base: Some(cdn_base),
        buffer_size: BUFFER_SIZE,
        region: "us-east-1".to_string(),
        insecure: true,
        on_source_error: SourceErrorPolicy::default(),
    }
}

fn path(value: &str) -> LogicalPath {
    LogicalPath::new(value.to_string()).unwrap()
}

fn trace_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Spawn a stub CDN on an ephemeral port and return its base URL
async fn spawn_cdn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on
async fn unreachable_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn storage_with_cdn(cdn_base: String, origin: Arc<InMemory>) -> Arc<dyn Storage> {
    StorageBuilder::new(config_with_cdn(cdn_base)).build_with_store(origin)
}

async fn origin_with(path_str: &str, content: &[u8]) -> Arc<InMemory> {
    let origin = Arc::new(InMemory::new());
    let mut config = config_with_cdn(String::new());
    config.cdn_base = None;
    let direct = StorageBuilder::new(config).build_with_store(origin.clone());
    direct
        .put_content(&path(path_str), Bytes::copy_from_slice(content))
        .await
        .unwrap();
    origin
}

#[tokio::test]
async fn get_content_prefers_cdn() {
    trace_init();
    let base = spawn_cdn(Router::new().route("/{*path}", get(|| async { "cdn content" }))).await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let content = storage.get_content(&path("a/b.txt")).await.unwrap();
    assert_eq!(content, Bytes::from_static(b"cdn content"));
}

#[tokio::test]
async fn get_content_falls_back_on_cdn_404() {
    trace_init();
    let base = spawn_cdn(Router::new().route(
        "/{*path}",
        get(|| async { StatusCode::NOT_FOUND }),
    ))
    .await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let content = storage.get_content(&path("a/b.txt")).await.unwrap();
    assert_eq!(content, Bytes::from_static(b"origin content"));
}

#[tokio::test]
async fn get_content_falls_back_on_cdn_500() {
    trace_init();
    let base = spawn_cdn(Router::new().route(
        "/{*path}",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let content = storage.get_content(&path("a/b.txt")).await.unwrap();
    assert_eq!(content, Bytes::from_static(b"origin content"));
}

#[tokio::test]
async fn get_content_falls_back_when_cdn_unreachable() {
    trace_init();
    let base = unreachable_base().await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let content = storage.get_content(&path("a/b.txt")).await.unwrap();
    assert_eq!(content, Bytes::from_static(b"origin content"));
}

#[tokio::test]
async fn missing_everywhere_is_path_not_found() {
    trace_init();
    let base = spawn_cdn(Router::new().route(
        "/{*path}",
        get(|| async { StatusCode::NOT_FOUND }),
    ))
    .await;
    let storage = storage_with_cdn(base, Arc::new(InMemory::new()));

    match storage.get_content(&path("a/b.txt")).await {
        Err(StorageError::PathNotFound { path }) => assert_eq!(path, "a/b.txt"),
        other => panic!("expected PathNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn stream_read_prefers_cdn_and_rechunks() {
    trace_init();
    let body: Vec<u8> = (0..3 * BUFFER_SIZE + 100).map(|i| (i % 251) as u8).collect();
    let served = body.clone();
    let base = spawn_cdn(Router::new().route(
        "/{*path}",
        get(move || {
            let served = served.clone();
            async move { served }
        }),
    ))
    .await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let mut stream = storage.stream_read(&path("a/b.txt")).await.unwrap();
    let mut all = Vec::new();
    let mut sizes = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        sizes.push(chunk.len());
        all.extend_from_slice(&chunk);
    }

    assert_eq!(all, body);
    // Every chunk except the last is exactly the configured buffer size.
    for size in &sizes[..sizes.len() - 1] {
        assert_eq!(*size, BUFFER_SIZE);
    }
}

#[tokio::test]
async fn stream_read_falls_back_on_cdn_404() {
    trace_init();
    let base = spawn_cdn(Router::new().route(
        "/{*path}",
        get(|| async { StatusCode::NOT_FOUND }),
    ))
    .await;
    let origin = origin_with("a/b.txt", b"origin content").await;
    let storage = storage_with_cdn(base, origin);

    let mut stream = storage.stream_read(&path("a/b.txt")).await.unwrap();
    let mut all = Vec::new();
    while let Some(chunk) = stream.next().await {
        all.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(all, b"origin content");
}

#[tokio::test]
async fn stream_read_missing_everywhere_is_path_not_found() {
    trace_init();
    let base = unreachable_base().await;
    let storage = storage_with_cdn(base, Arc::new(InMemory::new()));

    assert!(matches!(
        storage.stream_read(&path("a/b.txt")).await,
        Err(StorageError::PathNotFound { .. })
    ));
}
