//! Flattening of the feed tree into one record per station.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::xml::{City, Markers, Place};
use crate::city_id::{CityId, CityIdError};

/// Number of available bikes as reported by the feed.
///
/// The feed uses plain integers for most stations but also values such as
/// `"5+"`, which are kept verbatim instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BikeCount {
    Count(u32),
    Text(String),
}

impl BikeCount {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(count) => BikeCount::Count(count),
            Err(_) => BikeCount::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for BikeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BikeCount::Count(count) => count.fmt(f),
            BikeCount::Text(text) => f.write_str(text),
        }
    }
}

/// Station coordinates, kept as the feed's attribute text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub lat: String,
    pub lng: String,
}

/// One station observation of the target country.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub city_id: CityId,
    pub city_name: String,
    pub name: String,
    pub uid: String,
    pub bikes: BikeCount,
    pub coordinates: Coordinates,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordErrorKind {
    #[error("invalid city uid: {0}")]
    CityId(#[from] CityIdError),
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),
}

/// A station (or a whole city) that could not be turned into records.
///
/// The identifying attributes are captured from the node that failed, so the
/// diagnostic always names the right city.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{country} city {city_uid:?} ({city_name:?}) station {station_uid:?}: {kind}")]
pub struct RecordError {
    pub country: String,
    pub city_uid: Option<String>,
    pub city_name: Option<String>,
    /// `None` when the whole city was rejected.
    pub station_uid: Option<String>,
    pub kind: RecordErrorKind,
}

/// Result of flattening the target country's part of the feed.
#[derive(Debug, Default)]
pub struct Extraction {
    pub stations: Vec<StationRecord>,
    pub errors: Vec<RecordError>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.errors.is_empty()
    }
}

/// Walks every `country` node whose code equals `country_code` and every
/// station below it, in document order.
///
/// Each station ends up either in [`Extraction::stations`] or as one entry in
/// [`Extraction::errors`]. A station is attributed to the city node that
/// encloses it, so countries listing several cities are split correctly.
pub fn extract_stations(markers: &Markers, country_code: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for country in markers
        .countries
        .iter()
        .filter(|c| c.code.as_deref() == Some(country_code))
    {
        for city in &country.cities {
            extract_city(country_code, city, &mut extraction);
        }
    }

    extraction
}

fn extract_city(code: &str, city: &City, out: &mut Extraction) {
    let city_error = |station_uid: Option<&String>, kind: RecordErrorKind| RecordError {
        country: code.to_string(),
        city_uid: city.uid.clone(),
        city_name: city.name.clone(),
        station_uid: station_uid.cloned(),
        kind,
    };

    let city_id = match city.uid.as_deref() {
        None => Err(RecordErrorKind::MissingAttribute("uid")),
        Some(raw) => CityId::normalize(raw).map_err(RecordErrorKind::from),
    };
    let city_id = match city_id {
        Ok(id) => id,
        Err(kind) => {
            out.errors.push(city_error(None, kind));
            return;
        }
    };
    let city_name = city.name.clone().unwrap_or_default();

    for place in &city.places {
        match station_record(city_id, &city_name, place) {
            Ok(record) => out.stations.push(record),
            Err(kind) => out.errors.push(city_error(place.uid.as_ref(), kind)),
        }
    }
}

fn station_record(
    city_id: CityId,
    city_name: &str,
    place: &Place,
) -> Result<StationRecord, RecordErrorKind> {
    fn required<'a>(
        value: &'a Option<String>,
        name: &'static str,
    ) -> Result<&'a String, RecordErrorKind> {
        value
            .as_ref()
            .ok_or(RecordErrorKind::MissingAttribute(name))
    }

    Ok(StationRecord {
        city_id,
        city_name: city_name.to_string(),
        name: required(&place.name, "name")?.clone(),
        uid: required(&place.uid, "uid")?.clone(),
        bikes: BikeCount::parse(required(&place.bikes, "bikes")?),
        coordinates: Coordinates {
            lat: required(&place.lat, "lat")?.clone(),
            lng: required(&place.lng, "lng")?.clone(),
        },
    })
}
