//! Image uploads from the admin editors.
//!
//! Files are stored under a generated name and addressed by a public URL:
//! - [`LocalObjectStore`]: a directory served at `/uploads`
//! - [`HttpObjectStore`]: a hosted storage bucket (Supabase-style REST API)

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::body::Bytes;
use rand::Rng;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::StorageConfig;

/// URL prefix of the local upload directory.
pub const LOCAL_UPLOAD_PREFIX: &str = "/uploads";

/// Errors that can occur when storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Somewhere uploaded files can be put and fetched back by URL.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Store `bytes` as `name` and return the public URL.
    async fn put(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, UploadError>;
}

// =============================================================================
// Naming
// =============================================================================

/// Generate a unique object name from the uploaded file name:
/// `{stem}-{unix millis}-{random below 1e9}{.ext}`.
#[must_use]
pub fn object_name(original: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    let suffix = rand::rng().random_range(0..1_000_000_000_u32);
    object_name_with(original, millis, suffix)
}

fn object_name_with(original: &str, millis: u128, suffix: u32) -> String {
    // Browsers may send a full client-side path.
    let file_name = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let path = Path::new(file_name);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_owned());
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    format!("{stem}-{millis}-{suffix}{extension}")
}

/// Keep ASCII letters, digits, `-` and `_`; collapse everything else to `-`.
fn sanitize(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_owned()
}

// =============================================================================
// Local directory
// =============================================================================

/// Writes uploads to a local directory.
pub struct LocalObjectStore {
    dir: PathBuf,
}

impl LocalObjectStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        name: &str,
        _content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(name), &bytes).await?;
        Ok(format!("{LOCAL_UPLOAD_PREFIX}/{name}"))
    }
}

// =============================================================================
// Hosted bucket
// =============================================================================

/// Uploads to a hosted storage bucket.
#[derive(Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStore {
    /// Create a client for the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: StorageConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/object/{}/{name}",
            self.config.url.as_str().trim_end_matches('/'),
            self.config.bucket
        )
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "{}/object/public/{}/{name}",
            self.config.url.as_str().trim_end_matches('/'),
            self.config.bucket
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<String, UploadError> {
        let bearer = HeaderValue::from_str(&format!(
            "Bearer {}",
            self.config.service_key.expose_secret()
        ))
        .map_err(|e| UploadError::Api {
            status: 0,
            message: format!("invalid service key: {e}"),
        })?;

        let response = self
            .client
            .post(self.object_url(name))
            .header(AUTHORIZATION, bearer)
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(name))
    }
}
