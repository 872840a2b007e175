//! XML parser for the nextbike station feed.

mod station;
mod xml;

pub use station::{
    BikeCount, Coordinates, Extraction, RecordError, RecordErrorKind, StationRecord,
    extract_stations,
};
pub use xml::{City, Country, Markers, Place};

use anyhow::{Context, Result};

/// Decodes the raw feed body into its [`Markers`] tree.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or not a well-formed feed
/// document, e.g. when the server answered with an error page.
pub fn parse_feed(bytes: &[u8]) -> Result<Markers> {
    let text = std::str::from_utf8(bytes).context("Feed is not valid UTF-8")?;
    quick_xml::de::from_str(text).context("Feed is not a valid markers document")
}
