//! Persistence of the run: one HTML page per configured city and the JSON
//! snapshot of every parsed city.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::aggregate::CityAggregate;
use crate::city_id::CityId;
use crate::config::Config;
use crate::render::{PageContext, Template};

/// Outcome of the page-writing pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageReport {
    pub written: Vec<PathBuf>,
    /// Feed cities without a configuration entry.
    pub unmatched: BTreeSet<CityId>,
    /// Configured cities that have no `filename`.
    pub skipped: BTreeSet<CityId>,
}

/// Path of a city page: `{base}/{filename}/index.html`.
pub fn page_path(base: &Path, filename: &str) -> PathBuf {
    base.join(filename).join("index.html")
}

/// Default snapshot location: `{base}/json/output.json`.
pub fn default_json_path(base: &Path) -> PathBuf {
    base.join("json").join("output.json")
}

/// Renders and writes the page of every configured city, in ascending id order.
///
/// `load_template` is called at most once, when the first configured city is
/// reached. Output directories are not created; the first failed write aborts
/// the pass and leaves the pages written so far in place.
pub fn write_city_pages<F>(
    base: &Path,
    cities: &BTreeMap<CityId, CityAggregate>,
    config: &Config,
    mut load_template: F,
    date: &str,
) -> Result<PageReport>
where
    F: FnMut() -> Result<Template>,
{
    let mut report = PageReport::default();
    let mut loaded: Option<Template> = None;

    for (id, city) in cities {
        let Some(city_config) = config.city(*id) else {
            report.unmatched.insert(*id);
            continue;
        };

        let Some(filename) = city_config.filename.as_deref() else {
            warn!(city_id = %id, "City is configured without a filename, skipping page");
            report.skipped.insert(*id);
            continue;
        };

        let template = match &mut loaded {
            Some(template) => template,
            slot => slot.insert(load_template()?),
        };

        let ctx = PageContext {
            name: city_config.name.as_deref().unwrap_or_default(),
            tags: &city_config.tags,
            stations: &city.stations,
            lat: &city.coordinates.lat,
            lng: &city.coordinates.lng,
            region: city_config.region.as_deref().unwrap_or_default(),
            date,
        };
        let body = template
            .render(&ctx)
            .with_context(|| format!("Failed to render page for city {id}"))?;

        let path = page_path(base, filename);
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write page {}", path.display()))?;
        debug!(city_id = %id, path = %path.display(), stations = city.stations.len(), "Page written");

        report.written.push(path);
    }

    Ok(report)
}

/// Writes `value` as JSON to `path`, replacing any previous file.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON snapshot {}", path.display()))?;
    info!(path = %path.display(), "JSON snapshot written");
    Ok(())
}
