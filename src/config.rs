use serde::Deserialize;

use crate::app::BuildError;

/// What to do when the upload source fails mid-stream during a chunked
/// write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorPolicy {
    /// Abort the upload and surface the source error
    #[default]
    Abort,
    /// Stop reading and commit the parts already sent
    CompletePartial,
}

/// Configuration for a remote object-store backend. Owned by the caller and
/// immutable for the backend's lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub access_key: String,
    pub secret_key: String,
    /// Store endpoint host, e.g. `localhost:9000` or
    /// `s3.eu-north-1.amazonaws.com`
    pub host: String,
    pub bucket: String,
    /// Root prefix applied to every logical path
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Optional CDN base URL consulted before the origin store on reads
    #[serde(default)]
    pub cdn_base: Option<String>,
    /// Chunk size for streaming reads, in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default = "default_region")]
    pub region: String,
    /// Allow plain-HTTP transport to the store
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub on_source_error: SourceErrorPolicy,
}

fn default_root_path() -> String {
    "/".to_string()
}

fn default_buffer_size() -> usize {
    128 * 1024
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl StoreConfig {
    /// Read the configuration from `STORAGE_*` environment variables
    pub fn from_env() -> Result<Self, BuildError> {
        fn required(name: &str) -> Result<String, BuildError> {
            std::env::var(name).map_err(|_| BuildError::Configuration {
                message: format!("{} environment variable required", name),
            })
        }

        let buffer_size = match std::env::var("STORAGE_BUFFER_SIZE") {
            Ok(raw) => raw.parse().map_err(|_| BuildError::Configuration {
                message: format!("invalid STORAGE_BUFFER_SIZE: {}", raw),
            })?,
            Err(_) => default_buffer_size(),
        };

        Ok(Self {
            access_key: required("STORAGE_S3_ACCESS_KEY")?,
            secret_key: required("STORAGE_S3_SECRET_KEY")?,
            host: required("STORAGE_S3_HOST")?,
            bucket: required("STORAGE_S3_BUCKET")?,
            root_path: std::env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| default_root_path()),
            cdn_base: std::env::var("STORAGE_CDN_BASE").ok(),
            buffer_size,
            region: std::env::var("STORAGE_S3_REGION").unwrap_or_else(|_| default_region()),
            insecure: std::env::var("STORAGE_S3_INSECURE")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            on_source_error: SourceErrorPolicy::default(),
        })
    }
}
