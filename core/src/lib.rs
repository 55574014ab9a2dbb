//! Client core for the weather records service.
//!
//! # Overview
//! Lets a user create weather lookups for a location and date range, list
//! them, edit their editable fields and delete them, against a REST backend.
//!
//! # Design
//! - `WeatherClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse` (host-does-IO pattern).
//! - `Transport` performs the round-trip; `UreqTransport` is the blocking
//!   network implementation.
//! - `WeatherApi` pairs the two into one call per operation.
//! - `WeatherForm` is the controller holding form, edit and list state. It
//!   reconciles with the server only by re-fetching the whole list.
//! - `view` renders controller state as plain text.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod view;

pub use api::WeatherApi;
pub use client::WeatherClient;
pub use controller::{Confirm, Editing, Outcome, RefreshOutcome, RefreshTicket, WeatherForm};
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Confirmation, FormField, RecordId, WeatherInput, WeatherRecord, WeatherSummary};
