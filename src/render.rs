//! City page rendering with Jinja templates.
//!
//! The template sees these variables:
//!
//! | name       | value                                               |
//! |------------|-----------------------------------------------------|
//! | `name`     | configured city name                                |
//! | `tags`     | configured tags (list)                              |
//! | `stations` | map of station name to bike count                   |
//! | `lat`      | latitude chosen for the city                        |
//! | `lng`      | longitude chosen for the city                       |
//! | `reg`      | configured `geo.region`                             |
//! | `date`     | render time, `YYYY-MM-DD HH:MM:SS`                  |
//!
//! Output is HTML-escaped. Python-style methods such as
//! `stations.items()` work, so pages written for Jinja2 render unchanged.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use crate::feed::BikeCount;

const PAGE: &str = "page.html";

/// Values handed to the template for one city page.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext<'a> {
    pub name: &'a str,
    pub tags: &'a [String],
    pub stations: &'a BTreeMap<String, BikeCount>,
    pub lat: &'a str,
    pub lng: &'a str,
    #[serde(rename = "reg")]
    pub region: &'a str,
    pub date: &'a str,
}

pub struct Template {
    env: Environment<'static>,
}

impl Template {
    /// Compiles `source`; syntax errors are reported here, not at render time.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
        env.add_template_owned(PAGE, source.into())?;
        Ok(Self { env })
    }

    /// Reads and compiles the template file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Self::new(source).with_context(|| format!("Failed to parse template {}", path.display()))
    }

    pub fn render(&self, ctx: &PageContext<'_>) -> Result<String> {
        let template = self.env.get_template(PAGE)?;
        Ok(template.render(ctx)?)
    }
}

/// Formats the page timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
