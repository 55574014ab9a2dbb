//! Plain-text rendering of the weather records screen.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use crate::controller::WeatherForm;
use crate::types::{FormField, WeatherInput, WeatherRecord, WeatherSummary};

pub const EMPTY_PLACEHOLDER: &str =
    "No weather records found. Submit a weather request to get started!";

/// Render the whole screen: create form, status message, record list.
pub fn render<T, C>(form: &WeatherForm<T, C>) -> String {
    Page(form).to_string()
}

/// Pretty-printed raw `weather_data` of one record.
pub fn render_raw(record: &WeatherRecord) -> String {
    serde_json::to_string_pretty(&record.weather_data)
        .unwrap_or_else(|_| record.weather_data.to_string())
}

/// The date part of a server timestamp, or the raw text if it doesn't parse.
pub fn created_date(created_at: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(created_at) {
        return ts.date_naive().to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.date().to_string();
    }
    created_at.to_string()
}

struct Page<'a, T, C>(&'a WeatherForm<T, C>);

impl<T, C> fmt::Display for Page<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = self.0;

        writeln!(f, "Add New Weather Request")?;
        write_fields(f, form.form())?;
        let button = if form.is_loading() { "Submitting..." } else { "Get Weather" };
        writeln!(f, "  [{button}]")?;
        writeln!(f)?;

        if !form.message().is_empty() {
            writeln!(f, "{}", form.message())?;
            writeln!(f)?;
        }

        let records = form.records();
        writeln!(f, "Weather Records ({})", records.len())?;
        if records.is_empty() {
            return writeln!(f, "{EMPTY_PLACEHOLDER}");
        }

        for record in records {
            writeln!(f, "----------------------------------------")?;
            match form.editing() {
                Some(editing) if editing.id == record.id => {
                    writeln!(f, "Editing Record (id {})", record.id)?;
                    write_fields(f, &editing.form)?;
                    writeln!(f, "  [Save] [Cancel]")?;
                }
                _ => write_card(f, record)?,
            }
        }
        Ok(())
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, input: &WeatherInput) -> fmt::Result {
    for field in FormField::ALL {
        writeln!(f, "  {:<11} {}", format!("{}:", field.label()), input.get(field))?;
    }
    Ok(())
}

fn write_card(f: &mut fmt::Formatter<'_>, record: &WeatherRecord) -> fmt::Result {
    writeln!(f, "{}", record.location)?;
    writeln!(f, "Id: {}", record.id)?;
    writeln!(f, "Period: {} to {}", record.start_date, record.end_date)?;
    let created = record.created_at.as_deref().map(created_date).unwrap_or_default();
    writeln!(f, "Created: {created}")?;

    if let Some(summary) = record.summary() {
        write_summary(f, &summary)?;
    }
    Ok(())
}

fn write_summary(f: &mut fmt::Formatter<'_>, s: &WeatherSummary) -> fmt::Result {
    writeln!(f, "Current Weather:")?;
    writeln!(f, "  Temperature: {}°C", blank(s.temperature))?;
    writeln!(f, "  Feels Like: {}°C", blank(s.feels_like))?;
    writeln!(
        f,
        "  Condition: {} - {}",
        blank(s.condition.as_deref()),
        blank(s.description.as_deref())
    )?;
    writeln!(f, "  Humidity: {}%", blank(s.humidity))?;
    writeln!(f, "  Wind: {} m/s", blank(s.wind_speed))?;
    writeln!(f, "  Country: {}", blank(s.country.as_deref()))?;
    writeln!(f, "  Coordinates: {}, {}", blank(s.lat), blank(s.lon))
}

fn blank<V: fmt::Display>(value: Option<V>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WeatherApi;
    use crate::controller::RefreshOutcome;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::transport::Transport;
    use serde_json::json;

    struct Offline;

    impl Transport for Offline {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    type Form = WeatherForm<Offline, fn(&str) -> bool>;

    fn form_with(records: Vec<WeatherRecord>) -> Form {
        let never: fn(&str) -> bool = |_| false;
        let mut form = WeatherForm::new(WeatherApi::new("http://localhost:8000", Offline), never);
        let ticket = form.begin_refresh();
        assert_eq!(
            form.finish_refresh(ticket, Ok(records)).unwrap(),
            RefreshOutcome::Applied
        );
        form
    }

    fn paris() -> WeatherRecord {
        serde_json::from_value(json!({
            "id": 1,
            "location": "Paris",
            "start_date": "2024-01-01",
            "end_date": "2024-01-03",
            "created_at": "2024-01-01T09:30:00+00:00",
            "weather_data": {
                "current": {
                    "main": {"temp": 3.5, "humidity": 87},
                    "weather": [{"main": "Rain", "description": "light rain"}],
                    "sys": {"country": "FR"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn empty_list_renders_placeholder_and_zero_count() {
        let page = render(&form_with(Vec::new()));
        assert!(page.contains("Weather Records (0)"));
        assert!(page.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn card_shows_location_period_and_weather() {
        let page = render(&form_with(vec![paris()]));
        assert!(page.contains("Weather Records (1)"));
        assert!(page.lines().any(|l| l == "Paris"));
        assert!(page.contains("Id: 1"));
        assert!(page.contains("Period: 2024-01-01 to 2024-01-03"));
        assert!(page.contains("Created: 2024-01-01"));
        assert!(page.contains("Temperature: 3.5°C"));
        assert!(page.contains("Condition: Rain - light rain"));
        assert!(page.contains("Humidity: 87%"));
        assert!(!page.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn missing_weather_fields_render_blank() {
        let page = render(&form_with(vec![paris()]));
        assert!(page.contains("Feels Like: °C"));
        assert!(page.contains("Wind:  m/s"));
        assert!(page.contains("Coordinates: , "));
    }

    #[test]
    fn record_in_edit_mode_renders_as_form() {
        let mut form = form_with(vec![paris()]);
        form.begin_edit(&paris());
        form.set_edit_field(FormField::Location, "Paris, FR");
        let page = render(&form);
        assert!(page.contains("Editing Record (id 1)"));
        assert!(page.contains("Paris, FR"));
        assert!(!page.contains("Period:"));

        form.cancel_edit();
        let page = render(&form);
        assert!(!page.contains("Editing Record"));
        assert!(page.contains("Period: 2024-01-01 to 2024-01-03"));
    }

    #[test]
    fn created_date_falls_back_to_raw_text() {
        assert_eq!(created_date("2024-06-01T23:10:05.123456"), "2024-06-01");
        assert_eq!(created_date("yesterday"), "yesterday");
    }

    #[test]
    fn raw_view_pretty_prints_payload() {
        let raw = render_raw(&paris());
        assert!(raw.contains("\"country\": \"FR\""));
    }
}
