use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;

use crate::{
    adapters::outbound::storage::{CachedStorage, RemoteObjectStore},
    config::StoreConfig,
    ports::{cache::ContentCache, storage::Storage},
};

/// Errors raised while assembling a storage backend
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Store client initialization error: {0}")]
    StoreInit(#[from] object_store::Error),
}

/// Builder wiring a configuration and an optional cache collaborator into a
/// ready-to-use storage backend
pub struct StorageBuilder {
    config: StoreConfig,
    cache: Option<Arc<dyn ContentCache>>,
}

impl StorageBuilder {
    /// Create a new builder from a configuration
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Attach a cache collaborator consulted around reads, writes and
    /// removals
    pub fn with_cache(mut self, cache: Arc<dyn ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build against the configured S3-compatible endpoint
    pub fn build(self) -> Result<Arc<dyn Storage>, BuildError> {
        let scheme = if self.config.insecure { "http" } else { "https" };
        let store = AmazonS3Builder::new()
            .with_endpoint(format!("{}://{}", scheme, self.config.host))
            .with_access_key_id(self.config.access_key.as_str())
            .with_secret_access_key(self.config.secret_key.as_str())
            .with_bucket_name(self.config.bucket.as_str())
            .with_region(self.config.region.as_str())
            .with_allow_http(self.config.insecure)
            .build()?;
        Ok(self.assemble(Arc::new(store)))
    }

    /// Build against an already-constructed store client
    pub fn build_with_store(self, store: Arc<dyn object_store::ObjectStore>) -> Arc<dyn Storage> {
        self.assemble(store)
    }

    fn assemble(self, store: Arc<dyn object_store::ObjectStore>) -> Arc<dyn Storage> {
        let remote: Arc<dyn Storage> = Arc::new(RemoteObjectStore::new(store, &self.config));
        match self.cache {
            Some(cache) => Arc::new(CachedStorage::new(remote, cache)),
            None => remote,
        }
    }
}

/// Convenience functions for common configurations
///
/// Create an in-memory-backed storage for testing and development
pub fn create_in_memory_storage(config: StoreConfig) -> Arc<dyn Storage> {
    StorageBuilder::new(config).build_with_store(Arc::new(InMemory::new()))
}

/// Create an S3-backed storage from the given configuration
pub fn create_s3_storage(config: StoreConfig) -> Result<Arc<dyn Storage>, BuildError> {
    StorageBuilder::new(config).build()
}

/// Create a storage backend from environment variables
pub fn create_storage_from_env() -> Result<Arc<dyn Storage>, BuildError> {
    StorageBuilder::new(StoreConfig::from_env()?).build()
}
