//! Application state shared across handlers.

use std::sync::Arc;

use crate::content_file::ContentFile;
use crate::db::{PgStore, RecordStore};
use crate::services::PasswordVerifier;
use crate::storage::MediaStorage;

/// Application state shared across all handlers.
///
/// Generic over the record store so the router runs unchanged against
/// `PostgreSQL` in production and the in-memory store under test.
pub struct AppState<S = PgStore> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    store: S,
    media: MediaStorage,
    content_file: ContentFile,
    verifier: PasswordVerifier,
}

// Manual impl: `S` itself need not be `Clone` for the `Arc` to be.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    #[must_use]
    pub fn new(
        store: S,
        media: MediaStorage,
        content_file: ContentFile,
        verifier: PasswordVerifier,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                media,
                content_file,
                verifier,
            }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    #[must_use]
    pub fn media(&self) -> &MediaStorage {
        &self.inner.media
    }

    #[must_use]
    pub fn content_file(&self) -> &ContentFile {
        &self.inner.content_file
    }

    #[must_use]
    pub fn verifier(&self) -> &PasswordVerifier {
        &self.inner.verifier
    }
}
