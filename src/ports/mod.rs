pub mod cache;
pub mod storage;

// Re-export all port traits for convenience
pub use cache::ContentCache;
pub use storage::{into_async_read, ByteStream, Storage};
