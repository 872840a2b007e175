//! One complete run: config, fetch, parse, aggregate, write.

use anyhow::Result;
use chrono::{DateTime, TimeZone};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::aggregate::{CoordinatePolicy, export_records, group_by_city};
use crate::city_id::CityId;
use crate::config::Config;
use crate::feed::{extract_stations, parse_feed};
use crate::fetch::{HttpClient, load_source};
use crate::output::{default_json_path, write_city_pages, write_json};
use crate::render::{Template, format_timestamp};

pub const DEFAULT_FEED_URL: &str = "https://nextbike.net/maps/nextbike-official.xml";
pub const DEFAULT_COUNTRY: &str = "PL";

/// Inputs of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Feed URL, or a local file path.
    pub source: String,
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
    pub template_path: PathBuf,
    /// Overrides `{output_dir}/json/output.json`.
    pub json_output: Option<PathBuf>,
    pub country: String,
    pub coordinate_policy: CoordinatePolicy,
}

impl RunOptions {
    pub fn json_path(&self) -> PathBuf {
        self.json_output
            .clone()
            .unwrap_or_else(|| default_json_path(&self.output_dir))
    }
}

/// What a run produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cities: usize,
    pub stations: usize,
    pub rejected: usize,
    pub pages_written: Vec<PathBuf>,
    pub unmatched: BTreeSet<CityId>,
    pub json_path: PathBuf,
}

/// Runs the whole pipeline once.
///
/// Config and per-station problems are logged and skipped; fetch, parse and
/// write failures end the run with an error.
#[tracing::instrument(skip_all, fields(source = %opts.source, country = %opts.country))]
pub async fn run<C, Tz>(client: &C, opts: &RunOptions, now: &DateTime<Tz>) -> Result<RunSummary>
where
    C: HttpClient,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let config = Config::load_or_empty(&opts.config_path);

    let bytes = load_source(client, &opts.source).await?;
    let markers = parse_feed(&bytes)?;

    let extraction = extract_stations(&markers, &opts.country);
    if extraction.is_empty() {
        warn!(country = %opts.country, "Feed has no stations for the country");
    }
    for error in &extraction.errors {
        warn!(error = %error, "Skipping feed entry");
    }
    info!(
        stations = extraction.stations.len(),
        rejected = extraction.errors.len(),
        "Feed parsed"
    );

    let cities = group_by_city(&extraction.stations, opts.coordinate_policy);

    let date = format_timestamp(now);
    let report = write_city_pages(
        &opts.output_dir,
        &cities,
        &config,
        || Template::load(&opts.template_path),
        &date,
    )?;

    let json_path = opts.json_path();
    write_json(&json_path, &export_records(&cities))?;

    info!(
        count = report.unmatched.len(),
        ids = ?report.unmatched.iter().map(|id| id.get()).collect::<Vec<_>>(),
        "Cities without configuration"
    );
    info!(
        cities = cities.len(),
        pages = report.written.len(),
        "Run finished"
    );

    Ok(RunSummary {
        cities: cities.len(),
        stations: extraction.stations.len(),
        rejected: extraction.errors.len(),
        pages_written: report.written,
        unmatched: report.unmatched,
        json_path,
    })
}
