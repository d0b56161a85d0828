pub mod errors;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{StorageError, StorageResult, ValidationError};
pub use value_objects::LogicalPath;
