pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export key types for convenience

// Domain types - value objects and errors
pub use domain::{LogicalPath, StorageError, StorageResult, ValidationError};

// Port types - interfaces for external systems
pub use ports::{into_async_read, ByteStream, ContentCache, Storage};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    CachedStorage, CdnClient, InMemoryContentCache, RemoteObjectStore,
};

// Application factory and configuration
pub use app::{
    create_in_memory_storage, create_s3_storage, create_storage_from_env, BuildError,
    StorageBuilder,
};
pub use config::{SourceErrorPolicy, StoreConfig};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_storage, create_s3_storage, CachedStorage, ContentCache,
        InMemoryContentCache, LogicalPath, RemoteObjectStore, SourceErrorPolicy, Storage,
        StorageBuilder, StoreConfig,
    };
}
