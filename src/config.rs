//! City configuration: display metadata for every city that gets a page.
//!
//! Stored as YAML on disk:
//! ```yaml
//! cities:
//!   210:
//!     name: Warszawa
//!     filename: warszawa
//!     tags: [veturilo, rowery]
//!     geo.region: PL-MZ
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::city_id::CityId;

/// Display metadata for one city. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CityConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Region code for the `geo.region` meta tag; the YAML key is literally `geo.region`.
    #[serde(default, rename = "geo.region")]
    pub region: Option<String>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    cities: Option<Mapping>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    cities: HashMap<CityId, CityConfig>,
}

impl Config {
    /// Loads the config from a YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Parses the YAML document.
    ///
    /// Only a document that is not YAML, or whose `cities` is not a mapping,
    /// is an error. Single entries with a non-numeric key or a malformed body
    /// are logged and dropped; entries without any value (`372:`) are dropped
    /// too, so those cities stay unmatched.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to `null`, which should mean "no cities".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(content)?;

        let mut cities = HashMap::new();
        for (key, value) in raw.cities.unwrap_or_default() {
            let id = match serde_yaml::from_value::<CityId>(key.clone()) {
                Ok(id) => id,
                Err(e) => {
                    warn!(key = ?key, error = %e, "Ignoring config entry with invalid city id");
                    continue;
                }
            };

            if is_blank(&value) {
                debug!(city_id = %id, "Ignoring empty config entry");
                continue;
            }

            match serde_yaml::from_value::<CityConfig>(value) {
                Ok(city) => {
                    cities.insert(id, city);
                }
                Err(e) => warn!(city_id = %id, error = %e, "Ignoring malformed config entry"),
            }
        }

        Ok(Self { cities })
    }

    /// Loads the config, falling back to an empty one on any failure.
    ///
    /// A broken config is not fatal: every city in the feed is then reported
    /// as unmatched and only the JSON snapshot is written.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                if config.is_empty() {
                    warn!(path = %path.display(), "Config has no cities, no pages will be written");
                } else {
                    info!(path = %path.display(), cities = config.len(), "Config loaded");
                }
                config
            }
            Err(e) => {
                error!(path = %path.display(), error = %format!("{e:#}"), "Cannot load config");
                Self::default()
            }
        }
    }

    /// Returns the configuration for `id`, if one exists.
    pub fn city(&self, id: CityId) -> Option<&CityConfig> {
        self.cities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
cities:
  210:
    name: Warszawa
    filename: warszawa
    tags: [veturilo, rowery]
    geo.region: PL-MZ
  "372":
    name: Opole
"#;

    #[test]
    fn test_from_yaml_reads_all_fields() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.len(), 2);

        let warsaw = config.city(CityId::new(210)).unwrap();
        assert_eq!(warsaw.name.as_deref(), Some("Warszawa"));
        assert_eq!(warsaw.filename.as_deref(), Some("warszawa"));
        assert_eq!(warsaw.tags, vec!["veturilo", "rowery"]);
        assert_eq!(warsaw.region.as_deref(), Some("PL-MZ"));
    }

    #[test]
    fn test_missing_fields_are_permissive() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        let opole = config.city(CityId::new(372)).unwrap();
        assert_eq!(opole.filename, None);
        assert!(opole.tags.is_empty());
        assert_eq!(opole.region, None);
    }

    #[test]
    fn test_empty_document_has_no_cities() {
        assert!(Config::from_yaml("").unwrap().is_empty());
        assert!(Config::from_yaml("cities: {}").unwrap().is_empty());
        assert!(Config::from_yaml("other: 1").unwrap().is_empty());
        assert!(Config::from_yaml("cities:").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(Config::from_yaml("cities: [unclosed").is_err());
        assert!(Config::from_yaml("cities: [210, 372]").is_err());
    }

    #[test]
    fn test_non_numeric_key_is_dropped_and_others_kept() {
        let config = Config::from_yaml(
            "cities:\n  210:\n    name: Warszawa\n    filename: warszawa\n  krakow:\n    name: K\n",
        )
        .unwrap();

        assert_eq!(config.len(), 1);
        let warsaw = config.city(CityId::new(210)).unwrap();
        assert_eq!(warsaw.filename.as_deref(), Some("warszawa"));
    }

    #[test]
    fn test_negative_and_malformed_entries_are_dropped() {
        let config = Config::from_yaml(
            "cities:\n  -5:\n    name: Minus\n  372:\n    tags: 5\n  210:\n    name: Warszawa\n",
        )
        .unwrap();

        assert_eq!(config.len(), 1);
        assert!(config.city(CityId::new(210)).is_some());
        assert!(config.city(CityId::new(372)).is_none());
    }

    #[test]
    fn test_blank_entries_are_not_configured() {
        let config = Config::from_yaml(
            "cities:\n  372:\n  373: {}\n  210:\n    name: Warszawa\n",
        )
        .unwrap();

        assert!(config.city(CityId::new(372)).is_none());
        assert!(config.city(CityId::new(373)).is_none());
        assert!(config.city(CityId::new(210)).is_some());
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        let config = Config::load_or_empty(Path::new("/nonexistent/config.yaml"));
        assert!(config.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.city(CityId::new(210)).is_some());
        assert!(config.city(CityId::new(999)).is_none());
    }
}
