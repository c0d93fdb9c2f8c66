//! Seed content from a YAML file.
//!
//! Records are appended in file order through the same path the admin API
//! uses, so they land at the tail of whatever is already stored. Settings
//! present in the file replace the stored document.
//!
//! ```yaml
//! settings:
//!   hero:
//!     title: "We build brands"
//!     cta_text: "Talk to us"
//! categories:
//!   - name: Leadership
//! team:
//!   - name: Ada
//!     role: Founder
//!     bio: "Started the studio."
//!     category: Leadership
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use agency_admin::db::{
    self, OrderedCollection, PgRecord, PgStore, RecordStore, RepositoryError, SettingsRepository,
};
use agency_core::{
    AboutSettings, Category, Client, ContactSettings, GalleryItem, HeroSettings, JobListing,
    PortfolioItem, Service, SiteSetting, TeamMember,
};

/// Settings documents to write.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSettings {
    pub hero: Option<HeroSettings>,
    pub about: Option<AboutSettings>,
    pub contact: Option<ContactSettings>,
}

/// Contents of a seed file. Keys match the collection URL segments.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedFile {
    pub settings: SeedSettings,
    pub categories: Vec<Category>,
    pub team: Vec<TeamMember>,
    pub services: Vec<Service>,
    pub clients: Vec<Client>,
    pub portfolio: Vec<PortfolioItem>,
    pub gallery: Vec<GalleryItem>,
    pub careers: Vec<JobListing>,
}

impl SeedFile {
    /// Check every record before anything is written.
    ///
    /// Returns one message per invalid record.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        collect_invalid(&self.categories, &mut errors);
        collect_invalid(&self.team, &mut errors);
        collect_invalid(&self.services, &mut errors);
        collect_invalid(&self.clients, &mut errors);
        collect_invalid(&self.portfolio, &mut errors);
        collect_invalid(&self.gallery, &mut errors);
        collect_invalid(&self.careers, &mut errors);
        errors
    }
}

fn collect_invalid<R: PgRecord>(records: &[R], errors: &mut Vec<String>) {
    for (position, record) in records.iter().enumerate() {
        if let Err(e) = record.validate() {
            errors.push(format!("{}[{position}]: {e}", R::COLLECTION));
        }
    }
}

/// Counts written by a seed run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub records: usize,
    pub settings: usize,
}

/// Seed from a YAML file into the configured database.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a record is
/// invalid, or a database operation fails.
pub async fn run(file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url().ok_or("ADMIN_DATABASE_URL not set")?;

    if !file_path.exists() {
        return Err(format!("File not found: {}", file_path.display()).into());
    }

    info!(path = %file_path.display(), "Loading seed file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(file_path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let errors = seed.validate();
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = seed_store(&PgStore::new(pool), seed).await?;

    info!(
        records = summary.records,
        settings = summary.settings,
        "Seeding complete"
    );
    Ok(())
}

/// Write a parsed seed file into `store`.
///
/// # Errors
///
/// Returns the first store error. Records appended before the failure stay.
pub async fn seed_store<S: RecordStore>(
    store: &S,
    seed: SeedFile,
) -> Result<SeedSummary, RepositoryError> {
    let mut summary = SeedSummary::default();

    summary.settings += put_setting(store, seed.settings.hero).await?;
    summary.settings += put_setting(store, seed.settings.about).await?;
    summary.settings += put_setting(store, seed.settings.contact).await?;

    // Categories first so team grouping is complete as soon as members land.
    summary.records += append_all(store, seed.categories).await?;
    summary.records += append_all(store, seed.team).await?;
    summary.records += append_all(store, seed.services).await?;
    summary.records += append_all(store, seed.clients).await?;
    summary.records += append_all(store, seed.portfolio).await?;
    summary.records += append_all(store, seed.gallery).await?;
    summary.records += append_all(store, seed.careers).await?;

    Ok(summary)
}

async fn put_setting<S: RecordStore, T: SiteSetting>(
    store: &S,
    settings: Option<T>,
) -> Result<usize, RepositoryError> {
    let Some(settings) = settings else {
        return Ok(0);
    };
    SettingsRepository::new(store).put(&settings).await?;
    Ok(1)
}

async fn append_all<S: RecordStore, R: PgRecord>(
    store: &S,
    records: Vec<R>,
) -> Result<usize, RepositoryError> {
    let collection = OrderedCollection::<S, R>::new(store);
    let count = records.len();
    for record in records {
        collection.append(record).await?;
    }
    if count > 0 {
        info!(collection = %R::COLLECTION, count, "Seeded collection");
    }
    Ok(count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use agency_admin::db::MemoryStore;

    const SEED: &str = r#"
settings:
  hero:
    title: "We build brands"
    cta_text: "Talk to us"
categories:
  - name: Leadership
  - name: Design
team:
  - name: Ada
    role: Founder
    bio: Started the studio.
    category: Leadership
  - name: Lin
    role: Designer
    bio: Draws things.
    category: Design
careers:
  - title: Producer
    location: Remote
    employment_type: full_time
    description: Keeps projects moving.
"#;

    #[test]
    fn test_parse_seed_file() {
        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();
        assert_eq!(seed.categories.len(), 2);
        assert_eq!(seed.team.len(), 2);
        assert!(seed.services.is_empty());
        assert_eq!(seed.settings.hero.unwrap().title, "We build brands");
        assert!(seed.settings.about.is_none());
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let result: Result<SeedFile, _> = serde_yaml::from_str("testimonials: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_reports_position() {
        let seed: SeedFile = serde_yaml::from_str(
            "services:\n  - title: SEO\n    description: Rank.\n    icon: search\n  - title: ''\n    description: x\n    icon: y\n",
        )
        .unwrap();
        let errors = seed.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("services[1]"));
    }

    #[tokio::test]
    async fn test_seed_store_appends_in_file_order() {
        let store = MemoryStore::new();
        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();

        let summary = seed_store(&store, seed).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                records: 5,
                settings: 1
            }
        );

        let team = OrderedCollection::<_, TeamMember>::new(&store)
            .list()
            .await
            .unwrap();
        let names: Vec<_> = team.iter().map(|m| m.record.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Lin"]);
        assert_eq!(team[0].order_index, 0);
        assert_eq!(team[1].order_index, 1);

        let hero: HeroSettings = SettingsRepository::new(&store).get().await.unwrap();
        assert_eq!(hero.cta_text, "Talk to us");
        let about: AboutSettings = SettingsRepository::new(&store).get().await.unwrap();
        assert_eq!(about, AboutSettings::default());
    }

    #[tokio::test]
    async fn test_seed_store_appends_after_existing_records() {
        let store = MemoryStore::new();
        let categories = OrderedCollection::<_, Category>::new(&store);
        categories
            .append(Category {
                name: "Existing".to_string(),
            })
            .await
            .unwrap();

        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();
        seed_store(&store, seed).await.unwrap();

        let names: Vec<_> = categories
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.record.name)
            .collect();
        assert_eq!(names, ["Existing", "Leadership", "Design"]);
    }

    #[tokio::test]
    async fn test_seed_store_surfaces_store_failure() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();
        assert!(seed_store(&store, seed).await.is_err());
    }
}
