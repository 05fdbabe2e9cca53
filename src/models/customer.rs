//! Customer models: the partial summary embedded in service records and the
//! canonical record fetched by id.

use crate::domain::CustomerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Partial customer data inlined in a service record.
///
/// May be stale or incomplete relative to the canonical [`CustomerRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CustomerSummary {
    /// Customer's name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Customer's father's name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,

    /// Profile image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CustomerSummary {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Case-insensitive substring match on name or father's name.
    ///
    /// An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        let hit = |field: &Option<String>| {
            field
                .as_ref()
                .map(|v| v.to_lowercase().contains(&term))
                .unwrap_or(false)
        };
        term.is_empty() || hit(&self.name) || hit(&self.father_name)
    }
}

/// The canonical, fully hydrated customer returned by
/// `GET /api/customers/{id}/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    /// Server-side identifier, when the payload carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,

    /// Customer's name
    pub name: String,

    /// Customer's father's name
    pub father_name: String,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Profile image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Fields this client does not model explicitly
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CustomerRecord {
    pub fn new(name: impl Into<String>, father_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            father_name: father_name.into(),
            phone: None,
            image: None,
            extra: HashMap::new(),
        }
    }

    /// Display label used by the customer list, e.g. "Reza (Ali)".
    pub fn display_name(&self) -> String {
        if self.father_name.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.father_name)
        }
    }
}
