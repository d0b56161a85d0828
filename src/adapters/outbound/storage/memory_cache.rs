use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{domain::value_objects::LogicalPath, ports::cache::ContentCache};

/// In-memory implementation of ContentCache for testing and single-process
/// deployments. Unbounded; not suitable as-is for large keyspaces.
#[derive(Clone, Default)]
pub struct InMemoryContentCache {
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl InMemoryContentCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentCache for InMemoryContentCache {
    async fn get(&self, path: &LogicalPath) -> Option<Bytes> {
        self.entries.read().await.get(path.as_str()).cloned()
    }

    async fn put(&self, path: &LogicalPath, content: &Bytes) {
        self.entries
            .write()
            .await
            .insert(path.as_str().to_string(), content.clone());
    }

    async fn remove(&self, path: &LogicalPath) {
        self.entries.write().await.remove(path.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let cache = InMemoryContentCache::new();
        let path = LogicalPath::new("a/b.txt".to_string()).unwrap();
        let content = Bytes::from_static(b"hello");

        assert!(cache.get(&path).await.is_none());

        cache.put(&path, &content).await;
        assert_eq!(cache.get(&path).await, Some(content));

        cache.remove(&path).await;
        assert!(cache.get(&path).await.is_none());
    }
}
