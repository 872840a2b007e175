//! Numeric city identifiers shared by the feed and the city configuration.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CityIdError {
    #[error("city id is empty")]
    Empty,
    #[error("city id '{0}' is not a non-negative integer")]
    NotNumeric(String),
    #[error("city id '{0}' is out of range")]
    OutOfRange(String),
}

/// A city identifier after normalization.
///
/// Feed `uid` attributes and configuration keys both go through
/// [`CityId::normalize`] (or the equivalent integer path), so the join between
/// the two only ever compares `CityId` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CityId(u32);

impl CityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Trims surrounding whitespace and parses a decimal integer.
    ///
    /// Leading zeros are accepted (`"007"` is city 7). Signs other than a
    /// leading `+`, fractional values and anything above `u32::MAX` are
    /// rejected.
    pub fn normalize(raw: &str) -> Result<Self, CityIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CityIdError::Empty);
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CityIdError::NotNumeric(raw.to_string()));
        }

        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| CityIdError::OutOfRange(raw.to_string()))
    }

    fn from_i128(value: i128) -> Result<Self, CityIdError> {
        if value < 0 {
            return Err(CityIdError::NotNumeric(value.to_string()));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| CityIdError::OutOfRange(value.to_string()))
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct CityIdVisitor;

impl Visitor<'_> for CityIdVisitor {
    type Value = CityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer city id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CityId, E> {
        CityId::from_i128(i128::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CityId, E> {
        CityId::from_i128(i128::from(v)).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CityId, E> {
        CityId::normalize(v).map_err(E::custom)
    }
}

/// Accepts YAML/JSON integers as well as numeric strings such as `"210"`.
impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CityIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_number() {
        assert_eq!(CityId::normalize("100"), Ok(CityId::new(100)));
    }

    #[test]
    fn test_normalize_trims_and_strips_leading_zeros() {
        assert_eq!(CityId::normalize(" 100 "), Ok(CityId::new(100)));
        assert_eq!(CityId::normalize("007"), Ok(CityId::new(7)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(CityId::normalize(""), Err(CityIdError::Empty));
        assert_eq!(CityId::normalize("   "), Err(CityIdError::Empty));
        assert!(matches!(
            CityId::normalize("abc"),
            Err(CityIdError::NotNumeric(_))
        ));
        assert!(matches!(
            CityId::normalize("-1"),
            Err(CityIdError::NotNumeric(_))
        ));
        assert!(matches!(
            CityId::normalize("1.5"),
            Err(CityIdError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_out_of_range() {
        assert!(matches!(
            CityId::normalize("99999999999"),
            Err(CityIdError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_deserialize_from_yaml_integer_and_string_keys() {
        let ids: Vec<CityId> = serde_yaml::from_str("[210, \"372\", \" 8 \"]").unwrap();
        assert_eq!(ids, vec![CityId::new(210), CityId::new(372), CityId::new(8)]);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let result: Result<CityId, _> = serde_yaml::from_str("-4");
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_json_object_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(CityId::new(100), "Warszawa");
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"100":"Warszawa"}"#);
    }
}
