//! One call per API operation: build, execute, parse.

use tracing::error;

use crate::client::WeatherClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Confirmation, RecordId, WeatherInput, WeatherRecord};

/// A `WeatherClient` bound to a `Transport`.
///
/// Each call either resolves or fails once; there is no retry. Failures are
/// logged before being returned.
#[derive(Debug, Clone)]
pub struct WeatherApi<T> {
    client: WeatherClient,
    transport: T,
}

impl<T: Transport> WeatherApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: WeatherClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn submit_weather(&self, input: &WeatherInput) -> Result<WeatherRecord, ApiError> {
        let result = self
            .client
            .build_submit_weather(input)
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| self.client.parse_submit_weather(resp));
        logged(result, "submitting weather data")
    }

    pub fn get_all_weather(&self) -> Result<Vec<WeatherRecord>, ApiError> {
        let req = self.client.build_get_all_weather();
        let result = self
            .transport
            .execute(req)
            .and_then(|resp| self.client.parse_get_all_weather(resp));
        logged(result, "fetching weather data")
    }

    pub fn get_weather_by_id(&self, id: &RecordId) -> Result<WeatherRecord, ApiError> {
        let req = self.client.build_get_weather(id);
        let result = self
            .transport
            .execute(req)
            .and_then(|resp| self.client.parse_get_weather(resp));
        logged(result, "fetching weather data")
    }

    pub fn update_weather(
        &self,
        id: &RecordId,
        input: &WeatherInput,
    ) -> Result<WeatherRecord, ApiError> {
        let result = self
            .client
            .build_update_weather(id, input)
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| self.client.parse_update_weather(resp));
        logged(result, "updating weather data")
    }

    pub fn delete_weather(&self, id: &RecordId) -> Result<Confirmation, ApiError> {
        let req = self.client.build_delete_weather(id);
        let result = self
            .transport
            .execute(req)
            .and_then(|resp| self.client.parse_delete_weather(resp));
        logged(result, "deleting weather data")
    }
}

fn logged<R>(result: Result<R, ApiError>, action: &str) -> Result<R, ApiError> {
    if let Err(err) = &result {
        error!(status = ?err.status(), "error {action}: {err}");
    }
    result
}
