//! Upload-and-reference media storage.
//!
//! An upload is validated, stored under `<namespace>/<uuid>.<ext>`, and
//! answered with its public URL. The caller writes that URL onto a record in a
//! separate request; nothing here touches records, and a failed upload leaves
//! record state alone.

mod local;
mod supabase;

pub use local::LocalStorage;
pub use supabase::SupabaseStorage;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use axum::body::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted content types and the file extension each is stored with.
///
/// Raster formats only: uploads are served from the site's own origin, and
/// SVG can carry script.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("upload is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("upload is empty")]
    Empty,

    /// Object store answered with a non-success status.
    #[error("object store returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage misconfigured: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key prefix per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaNamespace {
    Team,
    Clients,
    Portfolio,
    Gallery,
    Hero,
}

impl MediaNamespace {
    pub const ALL: [Self; 5] = [
        Self::Team,
        Self::Clients,
        Self::Portfolio,
        Self::Gallery,
        Self::Hero,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Clients => "clients",
            Self::Portfolio => "portfolio",
            Self::Gallery => "gallery",
            Self::Hero => "hero",
        }
    }
}

impl fmt::Display for MediaNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| format!("unknown media namespace: {s}"))
    }
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Public URL to put on a record.
    pub url: String,
    /// Object key within the backend.
    pub path: String,
}

/// File extension for an accepted content type.
///
/// Parameters such as `; charset=...` are ignored.
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Check an upload and pick its object key.
///
/// # Errors
///
/// Returns `StorageError` if the upload is empty, too large, or not an
/// accepted image type.
pub fn object_path(
    namespace: MediaNamespace,
    content_type: &str,
    size: usize,
) -> Result<String, StorageError> {
    if size == 0 {
        return Err(StorageError::Empty);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(StorageError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    let ext = extension_for(content_type)
        .ok_or_else(|| StorageError::UnsupportedType(content_type.to_string()))?;
    Ok(format!("{namespace}/{}.{ext}", Uuid::new_v4()))
}

/// Configured media backend.
#[derive(Debug, Clone)]
pub enum MediaStorage {
    Local(LocalStorage),
    Supabase(SupabaseStorage),
}

impl MediaStorage {
    /// Validate and store an upload.
    ///
    /// No retry and no cleanup: a failure is reported once and the caller's
    /// records are left as they were.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on validation failure or backend error.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn put(
        &self,
        namespace: MediaNamespace,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, StorageError> {
        let path = object_path(namespace, content_type, bytes.len())?;
        let stored = match self {
            Self::Local(local) => local.put(&path, bytes).await?,
            Self::Supabase(supabase) => supabase.put(&path, content_type, bytes).await?,
        };
        info!(path = %stored.path, "media stored");
        Ok(stored)
    }

    /// Directory to serve at `/media`, for the local backend.
    #[must_use]
    pub fn local_dir(&self) -> Option<&Path> {
        match self {
            Self::Local(local) => Some(local.dir()),
            Self::Supabase(_) => None,
        }
    }
}
