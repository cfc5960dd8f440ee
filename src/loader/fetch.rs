//! Network tier: fetching one namespace's sprite.

use std::future::Future;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::LoadError;

/// Everything but unreserved URL characters is escaped in the path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Source of raw sprite text for a namespace.
pub trait SpriteFetcher: Send + Sync + 'static {
    fn fetch(&self, namespace: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// `{base_url}/{namespace}.svg` with the namespace percent-encoded.
pub fn sprite_url(base_url: &str, namespace: &str) -> String {
    format!(
        "{}/{}.svg",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(namespace, SEGMENT)
    )
}

/// Fetches sprites from the sprite server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl SpriteFetcher for HttpFetcher {
    async fn fetch(&self, namespace: &str) -> Result<String, LoadError> {
        let url = sprite_url(&self.base_url, namespace);
        crate::debug!("loader"; "GET {}", url);

        let fetch_error = |e: reqwest::Error| LoadError::Fetch {
            namespace: namespace.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                namespace: namespace.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(fetch_error)
    }
}
