//! Charger status classification and payment deep links
//!
//! Classification is a total function over whatever the endpoints send:
//! unknown statuses fall back to `Available`, error statuses always win.

use crate::model::{ChargerRecord, OnlineIndicator};
use serde::{Deserialize, Serialize};

/// Payment host used when none is configured
pub const DEFAULT_PAYMENT_BASE: &str = "https://incharge.app";

/// Display state of a single plug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    Available,
    Preparing,
    Finishing,
    Charging,
    Offline,
}

impl DisplayState {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayState::Available => "available",
            DisplayState::Preparing => "preparing",
            DisplayState::Finishing => "finishing",
            DisplayState::Charging => "charging",
            DisplayState::Offline => "offline",
        }
    }

    /// CSS class used by the HTML projection
    pub fn css_class(self) -> &'static str {
        match self {
            DisplayState::Available => "is-available",
            DisplayState::Preparing => "is-preparing",
            DisplayState::Finishing => "is-finishing",
            DisplayState::Charging => "is-charging",
            DisplayState::Offline => "is-offline",
        }
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw status / online pair.
///
/// Rule order (highest precedence first):
/// - faulted, unavailable, error -> Offline
/// - online flag not truthy -> Offline
/// - known state names map to themselves
/// - anything else -> Available
pub fn classify(status: Option<&str>, online: &OnlineIndicator) -> DisplayState {
    let normalized = status.unwrap_or_default().trim().to_lowercase();

    if matches!(normalized.as_str(), "faulted" | "unavailable" | "error") {
        return DisplayState::Offline;
    }
    if !online.is_online() {
        return DisplayState::Offline;
    }

    match normalized.as_str() {
        "preparing" => DisplayState::Preparing,
        "finishing" => DisplayState::Finishing,
        "charging" => DisplayState::Charging,
        _ => DisplayState::Available,
    }
}

/// Classify a full charger record
pub fn classify_record(record: &ChargerRecord) -> DisplayState {
    classify(record.status.as_deref(), &record.online)
}

/// Payment deep link on the default payment host
pub fn payment_link(location_key: &str, plug: &str) -> String {
    payment_link_with_base(DEFAULT_PAYMENT_BASE, location_key, plug)
}

/// Payment deep link: `<base>/now/<KEY>/<plug>`
pub fn payment_link_with_base(base: &str, location_key: &str, plug: &str) -> String {
    format!(
        "{}/now/{}/{}",
        base.trim_end_matches('/'),
        location_key.to_uppercase(),
        plug
    )
}
