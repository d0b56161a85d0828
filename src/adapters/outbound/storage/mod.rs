// Infrastructure error conversions
pub mod error;

// Storage implementations
pub mod cached;
pub mod cdn;
pub mod memory_cache;
pub mod remote;

// Re-export key types
pub use cached::CachedStorage;
pub use cdn::CdnClient;
pub use memory_cache::InMemoryContentCache;
pub use remote::RemoteObjectStore;
