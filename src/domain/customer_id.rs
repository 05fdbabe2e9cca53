//! CustomerId value object.

use super::errors::ValidationError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A type-safe wrapper for customer IDs.
///
/// The backend keys customers by integer primary key, but embedded customer
/// lists use JSON object keys, which are always strings. Both forms normalize
/// to the same decimal string so they join correctly.
///
/// # Example
///
/// ```
/// use residence_admin::domain::CustomerId;
///
/// let id = CustomerId::new("42").unwrap();
/// assert_eq!(id, CustomerId::from(42u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(String);

impl CustomerId {
    /// Create a new CustomerId, validating that it's not empty.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyId` if the provided ID is empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<u64> for CustomerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for CustomerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

struct CustomerIdVisitor;

impl<'de> Visitor<'de> for CustomerIdVisitor {
    type Value = CustomerId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-empty string or an integer customer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CustomerId, E> {
        CustomerId::new(v).map_err(E::custom)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<CustomerId, E> {
        CustomerId::new(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CustomerId, E> {
        Ok(CustomerId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CustomerId, E> {
        Ok(CustomerId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CustomerIdVisitor)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
