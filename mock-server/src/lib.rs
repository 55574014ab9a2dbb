use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod weather;

pub use error::AppError;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub id: i64,
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    pub created_at: DateTime<Utc>,
    pub weather_data: Value,
}

#[derive(Deserialize)]
pub struct CreateWeather {
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize, Default)]
pub struct UpdateWeather {
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateWeather {
    fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.lat.is_none()
            && self.lon.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Response envelope carrying a payload and an optional status message.
#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    records: BTreeMap<i64, WeatherRecord>,
}

impl Store {
    fn insert(&mut self, mut record: WeatherRecord) -> WeatherRecord {
        self.next_id += 1;
        record.id = self.next_id;
        self.records.insert(record.id, record.clone());
        record
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(root))
        .route("/create-weather/", post(create_weather))
        .route("/weather/", get(list_weather))
        .route(
            "/weather/{id}",
            get(get_weather).put(update_weather).delete(delete_weather),
        )
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("weather mock server listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn parse_date(value: &str, invalid: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| AppError::BadRequest(invalid.to_string()))
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::BadRequest(
            "Start date must be before end date".to_string(),
        ));
    }
    Ok(())
}

/// Look up current conditions; a blank location has none.
fn lookup(location: &str) -> Result<Value, AppError> {
    if location.trim().is_empty() {
        return Err(AppError::NotFound("Location not found or API error".to_string()));
    }
    Ok(weather::weather_data(location.trim()))
}

fn record_not_found() -> AppError {
    AppError::NotFound("Weather record not found".to_string())
}

/// Ids are stored as integers; any other path segment names no record.
fn record_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| record_not_found())
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Weather API is running"}))
}

async fn create_weather(
    State(db): State<Db>,
    Json(input): Json<CreateWeather>,
) -> Result<(StatusCode, Json<Envelope<WeatherRecord>>), AppError> {
    let invalid = "Invalid date format. Use YYYY-MM-DD";
    let start = parse_date(&input.start_date, invalid)?;
    let end = parse_date(&input.end_date, invalid)?;
    check_range(start, end)?;

    let weather_data = lookup(&input.location)?;
    let (lat, lon) = weather::coordinates(&weather_data["current"]);

    let record = db.write().await.insert(WeatherRecord {
        id: 0,
        location: input.location,
        lat: lat.or(input.lat),
        lon: lon.or(input.lon),
        start_date: input.start_date,
        end_date: input.end_date,
        created_at: Utc::now(),
        weather_data,
    });
    tracing::info!(id = record.id, location = %record.location, "weather record created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            message: Some("Weather data saved successfully".to_string()),
            data: record,
        }),
    ))
}

async fn list_weather(State(db): State<Db>) -> Json<Envelope<Vec<WeatherRecord>>> {
    let store = db.read().await;
    let mut records: Vec<WeatherRecord> = store.records.values().cloned().collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Json(Envelope {
        message: None,
        data: records,
    })
}

async fn get_weather(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<WeatherRecord>>, AppError> {
    let id = record_id(&id)?;
    let store = db.read().await;
    let record = store.records.get(&id).cloned().ok_or_else(record_not_found)?;
    Ok(Json(Envelope {
        message: None,
        data: record,
    }))
}

async fn update_weather(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateWeather>,
) -> Result<Json<Envelope<WeatherRecord>>, AppError> {
    let id = record_id(&id)?;
    let mut store = db.write().await;
    let record = store.records.get_mut(&id).ok_or_else(record_not_found)?;

    if input.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".to_string()));
    }

    let start = match &input.start_date {
        Some(s) => parse_date(s, "Invalid start_date format. Use YYYY-MM-DD")?,
        None => parse_date(&record.start_date, "Invalid start_date format. Use YYYY-MM-DD")?,
    };
    let end = match &input.end_date {
        Some(s) => parse_date(s, "Invalid end_date format. Use YYYY-MM-DD")?,
        None => parse_date(&record.end_date, "Invalid end_date format. Use YYYY-MM-DD")?,
    };
    check_range(start, end)?;

    let mut updated = record.clone();
    if let Some(lat) = input.lat {
        updated.lat = Some(lat);
    }
    if let Some(lon) = input.lon {
        updated.lon = Some(lon);
    }
    if let Some(start_date) = input.start_date {
        updated.start_date = start_date;
    }
    if let Some(end_date) = input.end_date {
        updated.end_date = end_date;
    }
    if let Some(location) = input.location {
        if location != updated.location {
            if let Ok(weather_data) = lookup(&location) {
                let (lat, lon) = weather::coordinates(&weather_data["current"]);
                updated.lat = lat;
                updated.lon = lon;
                updated.weather_data = weather_data;
            }
        }
        updated.location = location;
    }

    *record = updated.clone();
    tracing::info!(id, "weather record updated");
    Ok(Json(Envelope {
        message: Some("Weather record updated successfully".to_string()),
        data: updated,
    }))
}

async fn delete_weather(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = record_id(&id)?;
    let mut store = db.write().await;
    store.records.remove(&id).ok_or_else(record_not_found)?;
    tracing::info!(id, "weather record deleted");
    Ok(Json(json!({"message": "Weather record deleted successfully"})))
}
