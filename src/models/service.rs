//! Service record model: a floor-scoped billing/service entry that embeds
//! the customers it applies to.

use crate::domain::{CustomerId, Floor};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::customer::CustomerSummary;

/// Accepts a string or a number and keeps it as text.
///
/// Year and time fields arrive as numbers from the API but as strings from
/// the dashboard's select boxes.
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Customers embedded in a service record, in document order.
///
/// The wire format is a JSON object keyed by customer id. Anything that is
/// not an object (`null`, or the `0` placeholder new services are created
/// with) is read as an empty list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerList {
    entries: Vec<(CustomerId, CustomerSummary)>,
    /// Position of each id in `entries`
    index: HashMap<CustomerId, usize>,
}

impl CustomerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A repeated id overwrites the summary in place.
    pub fn insert(&mut self, id: CustomerId, summary: CustomerSummary) {
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 = summary,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, summary));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CustomerId, &CustomerSummary)> {
        self.entries.iter().map(|(id, summary)| (id, summary))
    }

    pub fn ids(&self) -> impl Iterator<Item = &CustomerId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn get(&self, id: &CustomerId) -> Option<&CustomerSummary> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, id: &CustomerId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CustomerId, CustomerSummary)> for CustomerList {
    fn from_iter<I: IntoIterator<Item = (CustomerId, CustomerSummary)>>(iter: I) -> Self {
        let mut list = CustomerList::new();
        for (id, summary) in iter {
            list.insert(id, summary);
        }
        list
    }
}

impl Serialize for CustomerList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, summary) in &self.entries {
            map.serialize_entry(id, summary)?;
        }
        map.end()
    }
}

struct CustomerListVisitor;

impl<'de> Visitor<'de> for CustomerListVisitor {
    type Value = CustomerList;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of customer id to customer summary")
    }

    fn visit_map<A>(self, mut access: A) -> Result<CustomerList, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut list = CustomerList::new();
        while let Some(id) = access.next_key::<CustomerId>()? {
            let summary = access.next_value::<Option<CustomerSummary>>()?;
            list.insert(id, summary.unwrap_or_default());
        }
        Ok(list)
    }

    fn visit_unit<E: de::Error>(self) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<CustomerList, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<CustomerList, E> {
        Ok(CustomerList::new())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<CustomerList, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(CustomerList::new())
    }
}

impl<'de> Deserialize<'de> for CustomerList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CustomerListVisitor)
    }
}

/// A service record as returned by `GET /services/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRecord {
    /// Unique identifier for the service
    pub id: u64,

    /// Floor the service applies to
    pub floor: Floor,

    /// Solar Hijri year the service was billed for
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,

    /// Month number (1-12)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,

    /// Billing period marker
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,

    /// Whether the service has been approved
    #[serde(default)]
    pub is_approved: bool,

    /// Customers covered by the service
    #[serde(default)]
    pub customers_list: CustomerList,
}

impl ServiceRecord {
    /// Create a service with no customers.
    pub fn new(id: u64, floor: Floor) -> Self {
        Self {
            id,
            floor,
            year: None,
            month: None,
            time: None,
            is_approved: false,
            customers_list: CustomerList::new(),
        }
    }

    /// Builder-style helper to attach a customer.
    pub fn with_customer(mut self, id: CustomerId, summary: CustomerSummary) -> Self {
        self.customers_list.insert(id, summary);
        self
    }
}

/// Request body for creating or updating a service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceRequest {
    pub floor: Floor,
    pub year: String,
    pub month: u8,
    pub time: u8,
    pub is_approved: bool,
}

impl ServiceRequest {
    /// Build a request for the given period. `time` mirrors the month
    /// number, as the backend expects.
    pub fn new(floor: Floor, year: impl Into<String>, month: u8, is_approved: bool) -> Self {
        Self {
            floor,
            year: year.into(),
            month,
            time: month,
            is_approved,
        }
    }
}
