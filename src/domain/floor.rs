//! Floor value object.

use super::errors::ValidationError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A floor number within the building.
///
/// Accepts either a JSON integer or a numeric string, since floor selectors
/// in the dashboard hand the value around as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Floor(i64);

impl Floor {
    pub fn new(number: i64) -> Self {
        Self(number)
    }

    pub fn number(&self) -> i64 {
        self.0
    }
}

impl FromStr for Floor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Floor)
            .map_err(|_| ValidationError::InvalidFloor(s.to_string()))
    }
}

impl Serialize for Floor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

struct FloorVisitor;

impl<'de> Visitor<'de> for FloorVisitor {
    type Value = Floor;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer floor number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Floor, E> {
        Ok(Floor(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Floor, E> {
        i64::try_from(v)
            .map(Floor)
            .map_err(|_| E::custom(ValidationError::InvalidFloor(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Floor, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Floor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FloorVisitor)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
