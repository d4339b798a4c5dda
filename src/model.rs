//! Data model shared by the fetch, render and refresh stages
//!
//! Groups and locations are static configuration. Charger records and the
//! merged dataset are rebuilt from scratch on every refresh cycle.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named column of locations on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationGroup {
    /// Column heading
    pub name: String,

    /// Locations in display order
    pub locations: Vec<Location>,
}

/// A physical charging site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Human readable label
    pub label: String,

    /// Endpoint key, also used in payment links
    pub key: String,
}

impl Location {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

impl LocationGroup {
    pub fn new(name: impl Into<String>, locations: Vec<Location>) -> Self {
        Self {
            name: name.into(),
            locations,
        }
    }
}

/// Flatten groups into the location list the aggregator consumes
pub fn all_locations(groups: &[LocationGroup]) -> Vec<Location> {
    groups
        .iter()
        .flat_map(|g| g.locations.iter().cloned())
        .collect()
}

/// Raw online flag exactly as the endpoint sent it.
///
/// Only `1`, `true` and `"1"` count as online.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnlineIndicator(pub Value);

impl OnlineIndicator {
    pub fn is_online(&self) -> bool {
        match &self.0 {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => s == "1",
            _ => false,
        }
    }
}

impl From<bool> for OnlineIndicator {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}

impl From<i64> for OnlineIndicator {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for OnlineIndicator {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

/// One plug at a location, as reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChargerRecord {
    /// Plug identifier; numeric identifiers are kept in their decimal form
    #[serde(default, deserialize_with = "lenient_string")]
    pub plug: String,

    /// Raw status string, if any
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,

    #[serde(default)]
    pub online: OnlineIndicator,
}

impl ChargerRecord {
    pub fn new(
        plug: impl Into<String>,
        status: impl Into<String>,
        online: impl Into<OnlineIndicator>,
    ) -> Self {
        Self {
            plug: plug.into(),
            status: Some(status.into()),
            online: online.into(),
        }
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value))
}

/// Location key -> chargers for one refresh cycle
pub type MergedDataset = BTreeMap<String, Vec<ChargerRecord>>;
