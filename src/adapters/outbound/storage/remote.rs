use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use object_store::{
    path::Path as StorePath, MultipartUpload, ObjectStore as ObjectStoreClient, PutPayload,
};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::{
    adapters::outbound::storage::cdn::{CdnClient, CdnFetch, CdnStream},
    config::{SourceErrorPolicy, StoreConfig},
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::LogicalPath,
    },
    ports::storage::{ByteStream, Storage},
};

/// Object stores commonly reject non-final multipart parts below 5 MiB.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// Storage backend over a remote object store, with an optional read-through
/// CDN front end consulted before the origin on reads.
///
/// Stateless: every operation resolves the logical path anew, and transport
/// concerns (timeouts, connection pooling) belong to the injected clients.
pub struct RemoteObjectStore {
    store: Arc<dyn ObjectStoreClient>,
    root_path: String,
    buffer_size: usize,
    on_source_error: SourceErrorPolicy,
    cdn: Option<CdnClient>,
}

impl RemoteObjectStore {
    /// Create a backend over an already-constructed store client
    pub fn new(store: Arc<dyn ObjectStoreClient>, config: &StoreConfig) -> Self {
        Self {
            store,
            root_path: config.root_path.clone(),
            buffer_size: config.buffer_size,
            on_source_error: config.on_source_error,
            cdn: config.cdn_base.as_deref().map(CdnClient::new),
        }
    }

    /// Resolve a logical path to an origin store key: the root prefix
    /// joined with the path, with exactly one leading separator stripped.
    fn resolve(&self, path: Option<&LogicalPath>) -> String {
        let joined = match path {
            Some(path) if !path.is_root() => {
                format!("{}/{}", self.root_path.trim_end_matches('/'), path.as_str())
            }
            _ => self.root_path.clone(),
        };
        match joined.strip_prefix('/') {
            Some(stripped) => stripped.to_string(),
            None => joined,
        }
    }

    fn location(&self, path: &LogicalPath) -> (String, StorePath) {
        let key = self.resolve(Some(path));
        let location = StorePath::from(key.as_str());
        (key, location)
    }

    async fn read_origin(&self, path: &LogicalPath) -> StorageResult<ByteStream> {
        let (_, location) = self.location(path);
        let result = self.store.get(&location).await.map_err(StorageError::from)?;
        let chunks = result
            .into_stream()
            .map(|chunk| chunk.map_err(StorageError::from));
        Ok(rechunk(chunks, self.buffer_size))
    }
}

#[async_trait]
impl Storage for RemoteObjectStore {
    async fn get_content(&self, path: &LogicalPath) -> StorageResult<Bytes> {
        if let Some(cdn) = &self.cdn {
            if let CdnFetch::Hit(content) = cdn.fetch(path).await {
                return Ok(content);
            }
            // Unavailable on the CDN, try contacting the origin directly.
        }

        let (_, location) = self.location(path);
        let result = self.store.get(&location).await.map_err(StorageError::from)?;
        result.bytes().await.map_err(StorageError::from)
    }

    async fn put_content(&self, path: &LogicalPath, content: Bytes) -> StorageResult<String> {
        let (key, location) = self.location(path);
        self.store
            .put(&location, PutPayload::from(content))
            .await
            .map_err(StorageError::from)?;
        Ok(key)
    }

    async fn stream_read(&self, path: &LogicalPath) -> StorageResult<ByteStream> {
        if let Some(cdn) = &self.cdn {
            if let CdnStream::Hit(body) = cdn.open_stream(path).await {
                let url = cdn.url_for(path);
                let chunks = body.map(move |chunk| {
                    // Past the first chunk there is no clean fallback; a
                    // broken CDN stream surfaces to the caller.
                    chunk.map_err(|err| StorageError::Backend {
                        message: format!("CDN read from {} failed mid-stream: {}", url, err),
                        source: Some(err.to_string()),
                    })
                });
                return Ok(rechunk(chunks, self.buffer_size));
            }
        }

        self.read_origin(path).await
    }

    async fn stream_write(
        &self,
        path: &LogicalPath,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<()> {
        let (key, location) = self.location(path);
        let chunk_size = self.buffer_size.max(MIN_PART_SIZE);

        let mut upload = self
            .store
            .put_multipart(&location)
            .await
            .map_err(StorageError::from)?;
        let mut parts = 0u32;

        loop {
            let chunk = match fill_chunk(source, chunk_size).await {
                Ok(chunk) => chunk,
                Err(err) => match self.on_source_error {
                    SourceErrorPolicy::CompletePartial => {
                        warn!(
                            key = %key,
                            parts,
                            error = %err,
                            "upload source failed; completing with the parts already sent"
                        );
                        break;
                    }
                    SourceErrorPolicy::Abort => {
                        abort_upload(upload.as_mut(), &key).await;
                        return Err(StorageError::SourceRead {
                            path: key,
                            message: err.to_string(),
                        });
                    }
                },
            };
            if chunk.is_empty() {
                break;
            }

            if let Err(err) = upload.put_part(PutPayload::from(chunk)).await {
                abort_upload(upload.as_mut(), &key).await;
                return Err(err.into());
            }
            parts += 1;
        }

        upload.complete().await.map_err(StorageError::from)?;
        debug!(key = %key, parts, "multipart upload complete");
        Ok(())
    }

    async fn list_directory(&self, path: Option<&LogicalPath>) -> StorageResult<Vec<String>> {
        let prefix = self.resolve(path);
        let location = (!prefix.is_empty()).then(|| StorePath::from(prefix.as_str()));

        let listing = self
            .store
            .list_with_delimiter(location.as_ref())
            .await
            .map_err(StorageError::from)?;

        let mut entries =
            Vec::with_capacity(listing.common_prefixes.len() + listing.objects.len());
        for dir in &listing.common_prefixes {
            if let Some(name) = dir.filename() {
                entries.push(name.to_string());
            }
        }
        for object in &listing.objects {
            if let Some(name) = object.location.filename() {
                entries.push(name.to_string());
            }
        }

        if entries.is_empty() {
            // The store has no directory concept; an empty listing reports
            // not-found for parity with the sibling backends.
            return Err(StorageError::DirectoryNotFound { path: prefix });
        }
        Ok(entries)
    }

    async fn exists(&self, path: &LogicalPath) -> StorageResult<bool> {
        let (_, location) = self.location(path);
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, path: &LogicalPath) -> StorageResult<()> {
        let (_, location) = self.location(path);

        match self.store.head(&location).await {
            Ok(_) => {
                // A single object
                return self
                    .store
                    .delete(&location)
                    .await
                    .map_err(StorageError::from);
            }
            Err(object_store::Error::NotFound { .. }) => {}
            Err(err) => return Err(err.into()),
        }

        // Assume an emulated directory: delete every object one level
        // under the prefix.
        let listing = self
            .store
            .list_with_delimiter(Some(&location))
            .await
            .map_err(StorageError::from)?;
        for object in listing.objects {
            self.store
                .delete(&object.location)
                .await
                .map_err(StorageError::from)?;
        }
        Ok(())
    }

    async fn get_size(&self, path: &LogicalPath) -> StorageResult<u64> {
        let (_, location) = self.location(path);
        let meta = self.store.head(&location).await.map_err(StorageError::from)?;
        Ok(meta.size)
    }
}

/// Regroup an inner stream into chunks of exactly `chunk_size` bytes,
/// except for the final chunk.
fn rechunk<S>(inner: S, chunk_size: usize) -> ByteStream
where
    S: Stream<Item = StorageResult<Bytes>> + Send + 'static,
{
    Box::pin(try_stream! {
        futures::pin_mut!(inner);
        let mut pending = BytesMut::new();
        while let Some(chunk) = inner.next().await {
            pending.extend_from_slice(&chunk?);
            while pending.len() >= chunk_size {
                yield pending.split_to(chunk_size).freeze();
            }
        }
        if !pending.is_empty() {
            yield pending.freeze();
        }
    })
}

/// Fill one chunk from the source, reading until the chunk is full or the
/// source reaches end-of-stream.
async fn fill_chunk(
    source: &mut (dyn AsyncRead + Send + Unpin),
    chunk_size: usize,
) -> std::io::Result<Bytes> {
    let mut chunk = vec![0u8; chunk_size];
    let mut filled = 0;
    while filled < chunk_size {
        let read = source.read(&mut chunk[filled..]).await?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    chunk.truncate(filled);
    Ok(Bytes::from(chunk))
}

async fn abort_upload(upload: &mut dyn MultipartUpload, key: &str) {
    if let Err(err) = upload.abort().await {
        warn!(key = %key, error = %err, "failed to abort multipart upload");
    }
}
