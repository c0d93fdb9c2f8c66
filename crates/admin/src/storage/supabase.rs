//! Supabase object storage backend.
//!
//! # API Reference
//!
//! - Upload: `POST {url}/storage/v1/object/{bucket}/{path}` with the raw bytes
//! - Public URL: `{url}/storage/v1/object/public/{bucket}/{path}`
//! - Authentication: service role key as bearer token and `apikey` header

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;

use super::{StorageError, StoredObject};
use crate::config::SupabaseConfig;

/// Outbound request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supabase storage client.
#[derive(Clone)]
pub struct SupabaseStorage {
    inner: Arc<SupabaseStorageInner>,
}

struct SupabaseStorageInner {
    client: reqwest::Client,
    url: String,
    bucket: String,
}

impl std::fmt::Debug for SupabaseStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStorage")
            .field("url", &self.inner.url)
            .field("bucket", &self.inner.bucket)
            .finish_non_exhaustive()
    }
}

impl SupabaseStorage {
    /// Create a new storage client.
    ///
    /// # Errors
    ///
    /// Returns error if the service key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StorageError> {
        let key = config.service_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            StorageError::Config(format!("invalid service key: {e}"))
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let mut apikey = HeaderValue::from_str(key).map_err(|e| {
            StorageError::Config(format!("invalid service key: {e}"))
        })?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseStorageInner {
                client,
                url: config.url.trim_end_matches('/').to_string(),
                bucket: config.bucket.clone(),
            }),
        })
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{path}",
            self.inner.url, self.inner.bucket
        )
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.inner.url, self.inner.bucket
        )
    }

    pub(super) async fn put(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, StorageError> {
        let response = self
            .inner
            .client
            .post(self.upload_url(path))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "object store rejected upload");
            return Err(StorageError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(StoredObject {
            url: self.public_url(path),
            path: path.to_string(),
        })
    }
}
