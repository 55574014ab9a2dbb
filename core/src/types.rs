//! Domain DTOs for the weather records API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `weather_data` is kept as an opaque `serde_json::Value`: the upstream
//! provider owns its shape, so the client only reads it through
//! [`WeatherSummary`], where every field is optional.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned record identifier. The backend may hand out integers or
/// strings (e.g. UUIDs); both are accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

/// A stored weather lookup returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherRecord {
    pub id: RecordId,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub weather_data: Value,
}

impl WeatherRecord {
    /// The editable fields of this record, as a form would hold them.
    pub fn to_input(&self) -> WeatherInput {
        WeatherInput {
            location: self.location.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }

    pub fn summary(&self) -> Option<WeatherSummary> {
        WeatherSummary::from_weather_data(&self.weather_data)
    }
}

/// Request payload for creating a record or replacing its editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInput {
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

impl WeatherInput {
    pub fn new(location: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            location: location.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Location => &mut self.location,
            FormField::StartDate => &mut self.start_date,
            FormField::EndDate => &mut self.end_date,
        };
        *slot = value.into();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Location => &self.location,
            FormField::StartDate => &self.start_date,
            FormField::EndDate => &self.end_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_empty() && self.start_date.is_empty() && self.end_date.is_empty()
    }
}

/// One of the editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Location,
    StartDate,
    EndDate,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Location, FormField::StartDate, FormField::EndDate];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Location => "Location",
            FormField::StartDate => "Start date",
            FormField::EndDate => "End date",
        }
    }
}

/// Body returned by a successful delete. The backend sends a message; an
/// empty body is also accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
}

/// Flattened view of `weather_data.current`. Every field is optional; a
/// missing or mistyped value is `None` and renders blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSummary {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl WeatherSummary {
    /// Returns `None` when the payload has no `current` object.
    pub fn from_weather_data(data: &Value) -> Option<Self> {
        let current = data.get("current").filter(|c| c.is_object())?;
        let num = |ptr: &str| current.pointer(ptr).and_then(Value::as_f64);
        let text = |ptr: &str| current.pointer(ptr).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            temperature: num("/main/temp"),
            feels_like: num("/main/feels_like"),
            humidity: num("/main/humidity"),
            pressure: num("/main/pressure"),
            condition: text("/weather/0/main"),
            description: text("/weather/0/description"),
            wind_speed: num("/wind/speed"),
            wind_direction: num("/wind/deg"),
            country: text("/sys/country"),
            lat: num("/coord/lat"),
            lon: num("/coord/lon"),
        })
    }
}
