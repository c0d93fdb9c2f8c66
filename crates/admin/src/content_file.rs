//! Flat-file content document.
//!
//! The older admin screens edit one JSON document on disk, section by
//! section. Each section is read whole and replaced whole; there is no
//! partial update. Writers in this process are serialised by a mutex and
//! every write goes to a sibling temp file that is renamed over the
//! document, so readers never observe a half-written file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use agency_core::MediaType;

/// Errors that can occur while reading or writing the content document.
#[derive(Debug, Error)]
pub enum ContentFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document on disk is not valid content JSON.
    #[error("corrupt content document: {0}")]
    Corrupt(serde_json::Error),

    /// A replacement section does not have the section's shape.
    #[error("malformed {section} payload: {reason}")]
    Malformed {
        section: ContentSection,
        reason: String,
    },
}

/// Home page hero banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_src: Option<String>,
    pub title: String,
    pub category: String,
    pub description: String,
}

/// The whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub hero: HeroSection,
    pub services: Vec<ServiceEntry>,
    pub team: Vec<TeamEntry>,
    /// Client names only.
    pub clients: Vec<String>,
    pub gallery: Vec<GalleryEntry>,
}

/// A top-level section of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentSection {
    Hero,
    Services,
    Team,
    Clients,
    Gallery,
}

impl ContentSection {
    pub const ALL: [Self; 5] = [
        Self::Hero,
        Self::Services,
        Self::Team,
        Self::Clients,
        Self::Gallery,
    ];

    /// Document key and URL segment.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::Team => "team",
            Self::Clients => "clients",
            Self::Gallery => "gallery",
        }
    }

    /// Wording used in error responses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hero => "hero content",
            other => other.key(),
        }
    }
}

impl fmt::Display for ContentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ContentSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| format!("unknown content section: {s}"))
    }
}

impl ContentDocument {
    fn section_value(&self, section: ContentSection) -> Result<JsonValue, serde_json::Error> {
        match section {
            ContentSection::Hero => serde_json::to_value(&self.hero),
            ContentSection::Services => serde_json::to_value(&self.services),
            ContentSection::Team => serde_json::to_value(&self.team),
            ContentSection::Clients => serde_json::to_value(&self.clients),
            ContentSection::Gallery => serde_json::to_value(&self.gallery),
        }
    }

    fn replace_section(
        &mut self,
        section: ContentSection,
        value: JsonValue,
    ) -> Result<(), serde_json::Error> {
        match section {
            ContentSection::Hero => self.hero = serde_json::from_value(value)?,
            ContentSection::Services => self.services = serde_json::from_value(value)?,
            ContentSection::Team => self.team = serde_json::from_value(value)?,
            ContentSection::Clients => self.clients = serde_json::from_value(value)?,
            ContentSection::Gallery => self.gallery = serde_json::from_value(value)?,
        }
        Ok(())
    }
}

/// Handle on the content document.
#[derive(Debug, Clone)]
pub struct ContentFile {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ContentFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty document if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `ContentFileError::Io` if the file cannot be created.
    pub async fn ensure_exists(&self) -> Result<(), ContentFileError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }
        self.write_document(&ContentDocument::default()).await?;
        info!(path = %self.path.display(), "created empty content document");
        Ok(())
    }

    /// Read the whole document.
    ///
    /// # Errors
    ///
    /// Returns `ContentFileError` if the file is missing or not valid JSON.
    pub async fn read(&self) -> Result<ContentDocument, ContentFileError> {
        let bytes = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(ContentFileError::Corrupt)
    }

    /// Read one section as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`ContentFile::read`].
    pub async fn section(&self, section: ContentSection) -> Result<JsonValue, ContentFileError> {
        self.read()
            .await?
            .section_value(section)
            .map_err(ContentFileError::Corrupt)
    }

    /// Replace one section, leaving the others as they are on disk.
    ///
    /// # Errors
    ///
    /// Returns `ContentFileError::Malformed` if `value` does not have the
    /// section's shape, or an I/O or parse error for the document itself.
    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    pub async fn replace_section(
        &self,
        section: ContentSection,
        value: JsonValue,
    ) -> Result<(), ContentFileError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read().await?;
        document
            .replace_section(section, value)
            .map_err(|e| ContentFileError::Malformed {
                section,
                reason: e.to_string(),
            })?;
        self.write_document(&document).await?;

        info!(%section, "content section replaced");
        Ok(())
    }

    /// Write via temp file and rename. Caller holds the write lock.
    async fn write_document(&self, document: &ContentDocument) -> Result<(), ContentFileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(document).map_err(ContentFileError::Corrupt)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
