//! Settings database operations.
//!
//! Each settings kind is a single document, replaced as a whole. A kind that
//! was never saved reads as its default (all fields empty).

use serde_json::Value as JsonValue;
use tracing::{info, instrument};

use agency_core::{AboutSettings, ContactSettings, HeroSettings, SettingsKind, SiteSetting};

use super::{RecordStore, RepositoryError};

/// Typed access to the singleton settings documents.
pub struct SettingsRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> SettingsRepository<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load a settings document, falling back to its default.
    ///
    /// # Errors
    ///
    /// Returns the store error, or `RepositoryError::DataCorruption` if the
    /// stored document no longer matches its type.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn get<T: SiteSetting>(&self) -> Result<T, RepositoryError> {
        let Some(document) = self.store.load_setting(T::KIND).await? else {
            return Ok(T::default());
        };
        serde_json::from_value(document.value)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid {} settings: {e}", T::KIND)))
    }

    /// Replace a settings document.
    ///
    /// # Errors
    ///
    /// Returns the store error.
    #[instrument(skip(self, settings), fields(kind = %T::KIND))]
    pub async fn put<T: SiteSetting>(&self, settings: &T) -> Result<T, RepositoryError> {
        let value = serde_json::to_value(settings)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable settings: {e}")))?;
        self.store.save_setting(T::KIND, &value).await?;
        info!("settings saved");
        Ok(settings.clone())
    }

    /// Load a settings document by kind, as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsRepository::get`].
    pub async fn get_json(&self, kind: SettingsKind) -> Result<JsonValue, RepositoryError> {
        match kind {
            SettingsKind::Hero => to_json(&self.get::<HeroSettings>().await?),
            SettingsKind::About => to_json(&self.get::<AboutSettings>().await?),
            SettingsKind::Contact => to_json(&self.get::<ContactSettings>().await?),
        }
    }

    /// Replace a settings document by kind from untyped JSON.
    ///
    /// Unknown fields are dropped and missing ones take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Malformed` if `value` does not fit the
    /// document type, or the store error.
    pub async fn put_json(
        &self,
        kind: SettingsKind,
        value: JsonValue,
    ) -> Result<JsonValue, RepositoryError> {
        match kind {
            SettingsKind::Hero => to_json(&self.put(&from_json::<HeroSettings>(value)?).await?),
            SettingsKind::About => to_json(&self.put(&from_json::<AboutSettings>(value)?).await?),
            SettingsKind::Contact => {
                to_json(&self.put(&from_json::<ContactSettings>(value)?).await?)
            }
        }
    }
}

fn to_json<T: SiteSetting>(settings: &T) -> Result<JsonValue, RepositoryError> {
    serde_json::to_value(settings)
        .map_err(|e| RepositoryError::DataCorruption(format!("unserializable settings: {e}")))
}

fn from_json<T: SiteSetting>(value: JsonValue) -> Result<T, RepositoryError> {
    serde_json::from_value(value)
        .map_err(|e| RepositoryError::Malformed(format!("invalid {} settings: {e}", T::KIND)))
}
