//! Singleton site settings.
//!
//! Each settings kind is one document, edited as a whole.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The singleton settings documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsKind {
    Hero,
    About,
    Contact,
}

impl SettingsKind {
    pub const ALL: [Self; 3] = [Self::Hero, Self::About, Self::Contact];

    /// Storage key and URL segment.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for SettingsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| format!("unknown settings kind: {s}"))
    }
}

/// A typed singleton settings document.
pub trait SiteSetting:
    Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: SettingsKind;
}

/// Home page hero banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroSettings {
    pub title: String,
    pub subtitle: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_image: String,
}

impl SiteSetting for HeroSettings {
    const KIND: SettingsKind = SettingsKind::Hero;
}

/// About page copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSettings {
    pub title: String,
    pub mission: String,
    pub vision: String,
    pub story: String,
}

impl SiteSetting for AboutSettings {
    const KIND: SettingsKind = SettingsKind::About;
}

/// Contact details shown in the footer and contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl SiteSetting for ContactSettings {
    const KIND: SettingsKind = SettingsKind::Contact;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_kind_parse() {
        assert_eq!("hero".parse::<SettingsKind>(), Ok(SettingsKind::Hero));
        assert_eq!("contact".parse::<SettingsKind>(), Ok(SettingsKind::Contact));
        assert!("footer".parse::<SettingsKind>().is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let hero: HeroSettings = serde_json::from_str(r#"{"title":"We build brands"}"#)
            .unwrap_or_default();
        assert_eq!(hero.title, "We build brands");
        assert_eq!(hero.cta_link, "");
    }
}
