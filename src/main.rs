//! CLI entry point: renders nextbike station pages for one country.
//!
//! Meant to be run periodically by an external scheduler; each invocation is
//! one fetch, parse and write pass.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use nextbike_pages::{
    aggregate::CoordinatePolicy,
    fetch::{BasicClient, DEFAULT_TIMEOUT},
    pipeline::{DEFAULT_COUNTRY, DEFAULT_FEED_URL, RunOptions, run},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "nextbike_pages")]
#[command(about = "Nextbike station pages for cities in one country", long_about = None)]
struct Cli {
    /// Feed URL to fetch, or a path to a saved feed file
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    url: String,

    /// YAML config with cities data
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to the directory holding the per-city page directories
    #[arg(long, default_value = "/var/www/nextbike/")]
    path: PathBuf,

    /// HTML template used for every city page
    #[arg(long, default_value = "template.html")]
    template: PathBuf,

    /// Where to write the JSON snapshot [default: <PATH>/json/output.json]
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Country code whose stations are processed
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Feed request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Which station's coordinates represent a city
    #[arg(long, value_enum, default_value_t = CoordinatePolicy::Last)]
    coordinates: CoordinatePolicy,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nextbike_pages.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nextbike_pages.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let opts = RunOptions {
        source: cli.url,
        config_path: cli.config,
        output_dir: cli.path,
        template_path: cli.template,
        json_output: cli.json_output,
        country: cli.country,
        coordinate_policy: cli.coordinates,
    };

    let client = BasicClient::with_timeout(Duration::from_secs(cli.timeout))?;
    let summary = run(&client, &opts, &Local::now()).await?;

    info!(
        cities = summary.cities,
        stations = summary.stations,
        rejected = summary.rejected,
        pages = summary.pages_written.len(),
        unmatched = summary.unmatched.len(),
        json = %summary.json_path.display(),
        "Done"
    );

    Ok(())
}
