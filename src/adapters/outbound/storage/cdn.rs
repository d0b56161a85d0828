use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use tracing::debug;

use crate::domain::value_objects::LogicalPath;

/// Outcome of a buffered CDN fetch. Unavailability is a signal, not an
/// error: the caller falls back to the origin store.
pub(crate) enum CdnFetch {
    Hit(Bytes),
    Unavailable,
}

/// Outcome of a streamed CDN fetch. A hit carries the response body with
/// the first chunk already pulled, so transport failures up to that point
/// stay inside the unavailable case.
pub(crate) enum CdnStream {
    Hit(BoxStream<'static, Result<Bytes, reqwest::Error>>),
    Unavailable,
}

/// Read-only HTTP client for the CDN mirror of the origin keyspace.
pub struct CdnClient {
    http: Client,
    base: String,
}

impl CdnClient {
    /// Create a client for the given CDN base URL
    pub fn new(base: impl Into<String>) -> Self {
        // Create reqwest client with reasonable defaults
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base: base.into(),
        }
    }

    /// CDN location for a logical path: `<base>/<path>`
    pub fn url_for(&self, path: &LogicalPath) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), path.as_str())
    }

    /// Fetch the full content for a path, buffered.
    pub(crate) async fn fetch(&self, path: &LogicalPath) -> CdnFetch {
        let url = self.url_for(path);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "CDN request failed, falling back to origin");
                return CdnFetch::Unavailable;
            }
        };

        if response.status().as_u16() >= 400 {
            debug!(%url, status = %response.status(), "CDN miss, falling back to origin");
            return CdnFetch::Unavailable;
        }

        match response.bytes().await {
            Ok(content) => CdnFetch::Hit(content),
            Err(err) => {
                debug!(%url, error = %err, "CDN body read failed, falling back to origin");
                CdnFetch::Unavailable
            }
        }
    }

    /// Open a streamed fetch for a path. The first body chunk is pulled
    /// eagerly so that a failure this early still allows a clean fallback
    /// to the origin store.
    pub(crate) async fn open_stream(&self, path: &LogicalPath) -> CdnStream {
        let url = self.url_for(path);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(%url, error = %err, "CDN request failed, falling back to origin");
                return CdnStream::Unavailable;
            }
        };

        if response.status().as_u16() >= 400 {
            debug!(%url, status = %response.status(), "CDN miss, falling back to origin");
            return CdnStream::Unavailable;
        }

        let mut body = response.bytes_stream().boxed();
        match body.next().await {
            None => CdnStream::Hit(stream::empty().boxed()),
            Some(Err(err)) => {
                debug!(%url, error = %err, "CDN stream failed before first chunk, falling back to origin");
                CdnStream::Unavailable
            }
            Some(Ok(first)) => {
                CdnStream::Hit(stream::once(async move { Ok(first) }).chain(body).boxed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_base_and_path() {
        let client = CdnClient::new("http://cdn.example.com");
        let path = LogicalPath::new("images/a.png".to_string()).unwrap();
        assert_eq!(client.url_for(&path), "http://cdn.example.com/images/a.png");
    }

    #[test]
    fn test_url_for_tolerates_trailing_slash_on_base() {
        let client = CdnClient::new("http://cdn.example.com/");
        let path = LogicalPath::new("a.txt".to_string()).unwrap();
        assert_eq!(client.url_for(&path), "http://cdn.example.com/a.txt");
    }
}
