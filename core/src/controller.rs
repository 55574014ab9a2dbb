//! Form/list controller: the state behind the weather records screen.
//!
//! # Design
//! Every mutation follows the same sequence: call the API, re-fetch the
//! whole collection, clear transient edit state, set a status message. The
//! local list is never patched; it is only replaced wholesale by a fetch.
//!
//! Fetches are sequenced with [`RefreshTicket`]s. A result is applied only
//! if its ticket is the newest one issued, so a slow fetch that completes
//! after a newer one cannot overwrite fresher data.
//!
//! Delete asks an injected [`Confirm`] capability instead of prompting
//! directly, so the flow runs headless in tests.

use tracing::{info, warn};

use crate::api::WeatherApi;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{FormField, RecordId, WeatherInput, WeatherRecord};

pub const LOAD_FAILED: &str = "Failed to load existing weather data.";
pub const SUBMITTING: &str = "Submitting...";
pub const SAVED: &str = "Weather data saved successfully!";
pub const UPDATED: &str = "Weather record updated successfully!";
pub const DELETED: &str = "Weather record deleted successfully!";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this weather record?";

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// The record currently in edit mode and its unsaved field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
    pub id: RecordId,
    pub form: WeatherInput,
}

/// Proof that a list fetch was started, carrying its sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Stale,
}

/// What a user action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation succeeded.
    Done,
    /// The API call failed; the message holds the error.
    Failed,
    /// Nothing to do (declined confirmation, no record in edit mode).
    Skipped,
}

pub struct WeatherForm<T, C> {
    api: WeatherApi<T>,
    confirm: C,
    form: WeatherInput,
    editing: Option<Editing>,
    records: Vec<WeatherRecord>,
    message: String,
    loading: bool,
    last_ticket: u64,
}

impl<T, C> WeatherForm<T, C> {
    pub fn new(api: WeatherApi<T>, confirm: C) -> Self {
        Self {
            api,
            confirm,
            form: WeatherInput::default(),
            editing: None,
            records: Vec::new(),
            message: String::new(),
            loading: false,
            last_ticket: 0,
        }
    }

    pub fn api(&self) -> &WeatherApi<T> {
        &self.api
    }

    pub fn form(&self) -> &WeatherInput {
        &self.form
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn editing(&self) -> Option<&Editing> {
        self.editing.as_ref()
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing.as_ref().map(|e| &e.id)
    }

    pub fn edit_form(&self) -> Option<&WeatherInput> {
        self.editing.as_ref().map(|e| &e.form)
    }

    pub fn record(&self, id: &RecordId) -> Option<&WeatherRecord> {
        self.records.iter().find(|r| &r.id == id)
    }
}

impl<T: Transport, C: Confirm> WeatherForm<T, C> {
    /// Initial load. A failure leaves the list empty and sets a message.
    pub fn load(&mut self) {
        if self.refresh().is_err() {
            self.message = LOAD_FAILED.to_string();
        }
    }

    /// Start a list fetch. Every ticket supersedes all earlier ones.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.last_ticket += 1;
        RefreshTicket(self.last_ticket)
    }

    /// Apply the result of the fetch started with `ticket`, unless a newer
    /// fetch has been started since.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<WeatherRecord>, ApiError>,
    ) -> Result<RefreshOutcome, ApiError> {
        if ticket.0 != self.last_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.last_ticket,
                "discarding stale list refresh"
            );
            return Ok(RefreshOutcome::Stale);
        }
        self.records = result?;
        Ok(RefreshOutcome::Applied)
    }

    /// Re-fetch the whole collection and replace the local list.
    pub fn refresh(&mut self) -> Result<RefreshOutcome, ApiError> {
        let ticket = self.begin_refresh();
        let result = self.api.get_all_weather();
        self.finish_refresh(ticket, result)
    }

    pub fn set_form_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Ignored when no record is in edit mode.
    pub fn set_edit_field(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(editing) = &mut self.editing {
            editing.form.set(field, value);
        }
    }

    /// Submit the create form. On success the form is reset; on failure it
    /// is kept so the user can correct and resubmit.
    pub fn submit(&mut self) -> Outcome {
        self.loading = true;
        self.message = SUBMITTING.to_string();

        let outcome = match accepted(self.api.submit_weather(&self.form)) {
            Ok(created) => {
                if let Some(record) = created {
                    info!(id = %record.id, location = %record.location, "weather record created");
                }
                let refreshed = self.refresh();
                self.form = WeatherInput::default();
                self.message = with_refresh_status(SAVED, refreshed);
                Outcome::Done
            }
            Err(err) => {
                self.message = err.to_string();
                Outcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    /// Put `record` in edit mode, discarding any other unsaved edit.
    pub fn begin_edit(&mut self, record: &WeatherRecord) {
        self.editing = Some(Editing {
            id: record.id.clone(),
            form: record.to_input(),
        });
    }

    /// Like [`begin_edit`](Self::begin_edit) for a record in the current
    /// list. Returns `false` if no such record is loaded.
    pub fn begin_edit_by_id(&mut self, id: &RecordId) -> bool {
        match self.record(id).cloned() {
            Some(record) => {
                self.begin_edit(&record);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save the record in edit mode. Edit state is kept on failure.
    pub fn save_edit(&mut self) -> Outcome {
        let Some(editing) = self.editing.clone() else {
            return Outcome::Skipped;
        };

        match accepted(self.api.update_weather(&editing.id, &editing.form)) {
            Ok(_) => {
                info!(id = %editing.id, "weather record updated");
                let refreshed = self.refresh();
                self.editing = None;
                self.message = with_refresh_status(UPDATED, refreshed);
                Outcome::Done
            }
            Err(err) => {
                self.message = err.to_string();
                Outcome::Failed
            }
        }
    }

    /// Delete after confirmation. A declined confirmation changes nothing.
    pub fn delete(&mut self, id: &RecordId) -> Outcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Outcome::Skipped;
        }

        match accepted(self.api.delete_weather(id)) {
            Ok(_) => {
                info!(%id, "weather record deleted");
                let refreshed = self.refresh();
                if self.editing_id() == Some(id) {
                    self.editing = None;
                }
                self.message = with_refresh_status(DELETED, refreshed);
                Outcome::Done
            }
            Err(err) => {
                self.message = err.to_string();
                Outcome::Failed
            }
        }
    }
}

/// A 2xx reply whose body has an unexpected shape still means the server
/// applied the mutation; only the typed payload is lost.
fn accepted<R>(result: Result<R, ApiError>) -> Result<Option<R>, ApiError> {
    match result {
        Ok(payload) => Ok(Some(payload)),
        Err(ApiError::Deserialization(reason)) => {
            warn!(%reason, "mutation accepted with an unrecognised response body");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// The mutation succeeded; report a failed follow-up fetch alongside it.
fn with_refresh_status(success: &str, refreshed: Result<RefreshOutcome, ApiError>) -> String {
    match refreshed {
        Ok(_) => success.to_string(),
        Err(err) => format!("{success} (refreshing the list failed: {err})"),
    }
}
