use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::{
    domain::{errors::StorageResult, value_objects::LogicalPath},
    ports::{
        cache::ContentCache,
        storage::{ByteStream, Storage},
    },
};

/// Storage wrapper that consults a cache collaborator around content reads,
/// writes and removals. Composition is explicit: the wrapped backend never
/// knows a cache exists, and every other operation delegates untouched.
pub struct CachedStorage {
    inner: Arc<dyn Storage>,
    cache: Arc<dyn ContentCache>,
}

impl CachedStorage {
    pub fn new(inner: Arc<dyn Storage>, cache: Arc<dyn ContentCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Storage for CachedStorage {
    async fn get_content(&self, path: &LogicalPath) -> StorageResult<Bytes> {
        if let Some(content) = self.cache.get(path).await {
            return Ok(content);
        }
        let content = self.inner.get_content(path).await?;
        self.cache.put(path, &content).await;
        Ok(content)
    }

    async fn put_content(&self, path: &LogicalPath, content: Bytes) -> StorageResult<String> {
        let key = self.inner.put_content(path, content.clone()).await?;
        self.cache.put(path, &content).await;
        Ok(key)
    }

    async fn stream_read(&self, path: &LogicalPath) -> StorageResult<ByteStream> {
        self.inner.stream_read(path).await
    }

    async fn stream_write(
        &self,
        path: &LogicalPath,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<()> {
        self.inner.stream_write(path, source).await
    }

    async fn list_directory(&self, path: Option<&LogicalPath>) -> StorageResult<Vec<String>> {
        self.inner.list_directory(path).await
    }

    async fn exists(&self, path: &LogicalPath) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    async fn remove(&self, path: &LogicalPath) -> StorageResult<()> {
        self.inner.remove(path).await?;
        self.cache.remove(path).await;
        Ok(())
    }

    async fn get_size(&self, path: &LogicalPath) -> StorageResult<u64> {
        self.inner.get_size(path).await
    }
}
