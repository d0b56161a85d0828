use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::value_objects::LogicalPath;

/// Port for the cache collaborator consulted around content reads, writes
/// and removals. Entry validity and eviction policy belong to the
/// implementation; the storage side only invokes the hooks.
#[async_trait]
pub trait ContentCache: Send + Sync + 'static {
    /// Cached content for a path, if a valid entry exists
    async fn get(&self, path: &LogicalPath) -> Option<Bytes>;

    /// Record the content observed for a path
    async fn put(&self, path: &LogicalPath, content: &Bytes);

    /// Drop any entry for a path
    async fn remove(&self, path: &LogicalPath);
}
