//! Stateless HTTP request builder and response parser for the weather API.
//!
//! # Design
//! `WeatherClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! Success bodies may arrive bare or wrapped as `{"data": ..., "message": ...}`;
//! both are accepted.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Confirmation, RecordId, WeatherInput, WeatherRecord};

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Synchronous, stateless client for the weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_submit_weather(&self, input: &WeatherInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/create-weather/", self.base_url), input)
    }

    pub fn build_get_all_weather(&self) -> HttpRequest {
        self.empty_request(HttpMethod::Get, format!("{}/weather/", self.base_url))
    }

    pub fn build_get_weather(&self, id: &RecordId) -> HttpRequest {
        self.empty_request(HttpMethod::Get, self.record_path(id))
    }

    pub fn build_update_weather(
        &self,
        id: &RecordId,
        input: &WeatherInput,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, self.record_path(id), input)
    }

    pub fn build_delete_weather(&self, id: &RecordId) -> HttpRequest {
        self.empty_request(HttpMethod::Delete, self.record_path(id))
    }

    pub fn parse_submit_weather(&self, response: HttpResponse) -> Result<WeatherRecord, ApiError> {
        check_status(&response, Operation::Create)?;
        parse_enveloped(&response.body)
    }

    pub fn parse_get_all_weather(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<WeatherRecord>, ApiError> {
        check_status(&response, Operation::List)?;
        parse_enveloped(&response.body)
    }

    pub fn parse_get_weather(&self, response: HttpResponse) -> Result<WeatherRecord, ApiError> {
        check_status(&response, Operation::Get)?;
        parse_enveloped(&response.body)
    }

    pub fn parse_update_weather(&self, response: HttpResponse) -> Result<WeatherRecord, ApiError> {
        check_status(&response, Operation::Update)?;
        parse_enveloped(&response.body)
    }

    /// Any JSON body is a valid confirmation; only a `message` string is
    /// picked out of it.
    pub fn parse_delete_weather(&self, response: HttpResponse) -> Result<Confirmation, ApiError> {
        check_status(&response, Operation::Delete)?;
        if response.body.trim().is_empty() {
            return Ok(Confirmation::default());
        }
        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(Confirmation {
            message: value.get("message").and_then(Value::as_str).map(str::to_string),
        })
    }

    fn record_path(&self, id: &RecordId) -> String {
        format!("{}/weather/{id}", self.base_url)
    }

    fn empty_request(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: String,
        input: &WeatherInput,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_enveloped<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to `ApiError::Status`, lifting the server's
/// `detail` field for operations that surface it.
fn check_status(response: &HttpResponse, operation: Operation) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let detail = if operation.uses_detail() {
        extract_detail(&response.body)
    } else {
        None
    };
    Err(ApiError::Status {
        operation,
        status: response.status,
        detail,
    })
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // validation errors arrive as structured detail
        other => Some(other.to_string()),
    }
}
