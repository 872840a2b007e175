//! Group-by-city reduction of the flat station records.
//!
//! Everything here is pure: the records come in feed order and the same
//! records always produce the same aggregates.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::city_id::CityId;
use crate::feed::{BikeCount, Coordinates, StationRecord};

/// Which station's coordinates represent a city on its page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CoordinatePolicy {
    /// First station of the city in feed order.
    First,
    /// Last station of the city in feed order.
    #[default]
    Last,
}

/// One station entry of the JSON snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportStation {
    pub station: String,
    pub uid: String,
    pub bike_count: BikeCount,
}

/// Per-city value of the JSON snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub name: String,
    pub data: Vec<ExportStation>,
}

/// Everything known about one city after the reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAggregate {
    pub name: String,
    /// Station name to bike count. A repeated station name keeps the later count.
    pub stations: BTreeMap<String, BikeCount>,
    pub coordinates: Coordinates,
    /// Stations in feed order, duplicates included.
    pub export: Vec<ExportStation>,
}

impl CityAggregate {
    fn new(record: &StationRecord) -> Self {
        Self {
            name: record.city_name.clone(),
            stations: BTreeMap::new(),
            coordinates: record.coordinates.clone(),
            export: Vec::new(),
        }
    }

    fn push(&mut self, record: &StationRecord, policy: CoordinatePolicy) {
        self.stations
            .insert(record.name.clone(), record.bikes.clone());
        if policy == CoordinatePolicy::Last {
            self.coordinates = record.coordinates.clone();
        }
        self.export.push(ExportStation {
            station: record.name.clone(),
            uid: record.uid.clone(),
            bike_count: record.bikes.clone(),
        });
    }

    pub fn export_record(&self) -> ExportRecord {
        ExportRecord {
            name: self.name.clone(),
            data: self.export.clone(),
        }
    }
}

/// Groups station records by city id.
///
/// The city name comes from the first record of each city; coordinates are
/// chosen according to `policy`.
pub fn group_by_city(
    records: &[StationRecord],
    policy: CoordinatePolicy,
) -> BTreeMap<CityId, CityAggregate> {
    let mut cities: BTreeMap<CityId, CityAggregate> = BTreeMap::new();

    for record in records {
        cities
            .entry(record.city_id)
            .or_insert_with(|| CityAggregate::new(record))
            .push(record, policy);
    }

    cities
}

/// Builds the JSON snapshot body: every aggregated city, configured or not.
pub fn export_records(
    cities: &BTreeMap<CityId, CityAggregate>,
) -> BTreeMap<CityId, ExportRecord> {
    cities
        .iter()
        .map(|(id, city)| (*id, city.export_record()))
        .collect()
}
