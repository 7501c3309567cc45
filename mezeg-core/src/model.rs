use serde::{Deserialize, Serialize};

/// A named place from the government locality dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    /// Hebrew name, shown in the picker.
    pub native_name: String,
    /// English name; unique within the catalog and the value sent to the
    /// weather provider.
    pub canonical_name: String,
}

/// Current conditions, mapped from the provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition_text: String,
    /// Always scheme-qualified (`https://...`).
    pub condition_icon_url: String,
    pub wind_kph: f64,
}

/// One persisted lookup. Stored oldest-first; displayed newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// ISO-8601 timestamp of the lookup.
    pub timestamp: String,
    pub city_name: String,
    pub country: String,
}
