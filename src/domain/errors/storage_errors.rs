use crate::domain::errors::ValidationError;

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// No object at the resolved key where presence was required
    PathNotFound { path: String },

    /// No keys under the resolved directory prefix
    DirectoryNotFound { path: String },

    /// Logical path failed validation
    InvalidPath(ValidationError),

    /// The upload source failed mid-stream during a chunked write
    SourceRead { path: String, message: String },

    /// Store or transport failure
    Backend {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::PathNotFound { path } => {
                write!(f, "No such key: '{}'", path)
            }
            StorageError::DirectoryNotFound { path } => {
                write!(f, "No such directory: '{}'", path)
            }
            StorageError::InvalidPath(err) => {
                write!(f, "Invalid logical path: {}", err)
            }
            StorageError::SourceRead { path, message } => {
                write!(f, "Upload source failed for '{}': {}", path, message)
            }
            StorageError::Backend { message, .. } => {
                write!(f, "Storage backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::InvalidPath(err)
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
