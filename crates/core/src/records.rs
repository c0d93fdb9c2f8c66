//! Managed collection entities.
//!
//! Each entity here is the *domain* part of a record: the fields an admin
//! edits. The store-assigned `id` and the `order_index` live on
//! [`Stored`](crate::ordering::Stored), which wraps any [`Record`].

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field validation failure.
///
/// Forms only enforce presence; free text and URLs are not format-checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// The managed ordered collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Team,
    Categories,
    Services,
    Clients,
    Portfolio,
    Gallery,
    Careers,
}

impl Collection {
    /// All collections, in admin navigation order.
    pub const ALL: [Self; 7] = [
        Self::Team,
        Self::Categories,
        Self::Services,
        Self::Clients,
        Self::Portfolio,
        Self::Gallery,
        Self::Careers,
    ];

    /// URL path segment for this collection.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Categories => "categories",
            Self::Services => "services",
            Self::Clients => "clients",
            Self::Portfolio => "portfolio",
            Self::Gallery => "gallery",
            Self::Careers => "careers",
        }
    }

    /// Backing table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Team => "team_members",
            Self::Categories => "team_categories",
            Self::Services => "services",
            Self::Clients => "clients",
            Self::Portfolio => "portfolio_items",
            Self::Gallery => "gallery_items",
            Self::Careers => "job_listings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| format!("unknown collection: {s}"))
    }
}

/// A domain record that lives in an ordered collection.
pub trait Record:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static
{
    /// Which collection this record type belongs to.
    const COLLECTION: Collection;

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns the first missing required field.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A team member shown on the team page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    /// Free-text label matched by equality against [`Category::name`].
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
}

impl Record for TeamMember {
    const COLLECTION: Collection = Collection::Team;

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("role", &self.role)?;
        require("bio", &self.bio)
    }
}

/// A team category. Deleting one never touches members that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub name: String,
}

impl Record for Category {
    const COLLECTION: Collection = Collection::Categories;

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

/// A service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Service {
    pub title: String,
    pub description: String,
    /// Icon name understood by the front end.
    pub icon: String,
}

impl Record for Service {
    const COLLECTION: Collection = Collection::Services;

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("icon", &self.icon)
    }
}

/// A client logo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

impl Record for Client {
    const COLLECTION: Collection = Collection::Clients;

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

/// A portfolio ("our work") project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct PortfolioItem {
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
}

impl Record for PortfolioItem {
    const COLLECTION: Collection = Collection::Portfolio;

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)?;
        require("description", &self.description)
    }
}

/// Gallery media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

/// A gallery entry: an image, or a video with a poster image in `src`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct GalleryItem {
    #[serde(default)]
    pub media_type: MediaType,
    pub src: String,
    #[serde(default)]
    pub video_src: Option<String>,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Record for GalleryItem {
    const COLLECTION: Collection = Collection::Gallery;

    fn validate(&self) -> Result<(), ValidationError> {
        require("src", &self.src)?;
        require("title", &self.title)?;
        require("category", &self.category)?;
        if self.media_type == MediaType::Video {
            require("video_src", self.video_src.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Job listing contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "employment_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

/// An open position on the careers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct JobListing {
    pub title: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub description: String,
}

impl Record for JobListing {
    const COLLECTION: Collection = Collection::Careers;

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("location", &self.location)?;
        require("description", &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> TeamMember {
        TeamMember {
            name: name.to_string(),
            role: "Designer".to_string(),
            bio: "Makes things look good".to_string(),
            category: None,
            image_url: None,
            linkedin_url: None,
            twitter_url: None,
        }
    }

    #[test]
    fn test_collection_slug_roundtrip() {
        for collection in Collection::ALL {
            assert_eq!(collection.slug().parse::<Collection>(), Ok(collection));
        }
        assert!("widgets".parse::<Collection>().is_err());
    }

    #[test]
    fn test_collection_tables() {
        assert_eq!(Collection::Team.table(), "team_members");
        assert_eq!(Collection::Categories.table(), "team_categories");
        assert_eq!(Collection::Careers.table(), "job_listings");
    }

    #[test]
    fn test_blank_required_field_rejected() {
        assert_eq!(
            member("   ").validate(),
            Err(ValidationError::Required("name"))
        );
        assert!(member("Ada").validate().is_ok());
    }

    #[test]
    fn test_video_requires_video_src() {
        let mut item = GalleryItem {
            media_type: MediaType::Video,
            src: "/poster.jpg".to_string(),
            video_src: None,
            title: "Launch reel".to_string(),
            category: "Events".to_string(),
            description: String::new(),
        };
        assert_eq!(item.validate(), Err(ValidationError::Required("video_src")));

        item.video_src = Some("/reel.mp4".to_string());
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let client: Client = serde_json::from_str(r#"{"name":"Acme"}"#)
            .unwrap_or_else(|e| panic!("client should parse: {e}"));
        assert_eq!(client.logo_url, None);
        assert_eq!(client.website_url, None);
    }

    #[test]
    fn test_employment_type_wire_format() {
        let json = serde_json::to_string(&EmploymentType::FullTime).ok();
        assert_eq!(json.as_deref(), Some("\"full_time\""));
    }
}
