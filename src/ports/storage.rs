use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use tokio::io::AsyncRead;

use crate::domain::{errors::StorageResult, value_objects::LogicalPath};

/// A lazy, finite, forward-only sequence of content chunks.
pub type ByteStream = BoxStream<'static, StorageResult<Bytes>>;

/// Port for a single storage backend behind the shared capability set.
/// This abstracts the actual backend (remote object store, local disk, etc.)
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Read the full content at a logical path
    async fn get_content(&self, path: &LogicalPath) -> StorageResult<Bytes>;

    /// Overwrite (or create) the content at a logical path; returns the
    /// resolved store key
    async fn put_content(&self, path: &LogicalPath, content: Bytes) -> StorageResult<String>;

    /// Read content as a chunked stream. A fresh call re-reads from the
    /// start; the stream itself is not restartable.
    async fn stream_read(&self, path: &LogicalPath) -> StorageResult<ByteStream>;

    /// Upload content from a byte source as a chunked write
    async fn stream_write(
        &self,
        path: &LogicalPath,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<()>;

    /// List the immediate children of an emulated directory, one level deep
    async fn list_directory(&self, path: Option<&LogicalPath>) -> StorageResult<Vec<String>>;

    /// Check whether an object exists at the logical path
    async fn exists(&self, path: &LogicalPath) -> StorageResult<bool>;

    /// Delete the object at the path, or every object one level under it
    async fn remove(&self, path: &LogicalPath) -> StorageResult<()>;

    /// Byte size of the object at the path, from a metadata-only lookup
    async fn get_size(&self, path: &LogicalPath) -> StorageResult<u64>;
}

/// Adapt a `ByteStream` into an `AsyncRead`, for callers handing content to
/// byte-oriented sinks.
pub fn into_async_read(stream: ByteStream) -> impl AsyncRead + Send + Unpin {
    tokio_util::io::StreamReader::new(
        stream.map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err)),
    )
}
