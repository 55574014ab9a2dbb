//! Interactive prompts built on `inquire`.
//!
//! Esc and Ctrl-C are not errors here: they come back as `None` so the
//! caller can abandon the current action and return to the menu.

use std::fmt;

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use weather_core::{FormField, RecordId, WeatherRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    Add,
    Edit,
    Delete,
    ShowRaw,
    Quit,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Refresh,
        Action::Add,
        Action::Edit,
        Action::Delete,
        Action::ShowRaw,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Refresh => "Refresh list",
            Action::Add => "Add weather request",
            Action::Edit => "Edit record",
            Action::Delete => "Delete record",
            Action::ShowRaw => "View raw data",
            Action::Quit => "Quit",
        })
    }
}

/// A record as shown in a selection list.
struct Choice {
    id: RecordId,
    label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn cancelled<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn action() -> Result<Option<Action>> {
    cancelled(Select::new("What next?", Action::ALL.to_vec()).prompt())
}

pub fn record(message: &str, records: &[WeatherRecord]) -> Result<Option<RecordId>> {
    let choices: Vec<Choice> = records
        .iter()
        .map(|r| Choice {
            id: r.id.clone(),
            label: format!("#{} {} ({} to {})", r.id, r.location, r.start_date, r.end_date),
        })
        .collect();
    Ok(cancelled(Select::new(message, choices).prompt())?.map(|c| c.id))
}

pub fn field(field: FormField, initial: &str) -> Result<Option<String>> {
    let label = format!("{}:", field.label());
    let placeholder = match field {
        FormField::Location => "City, zip code or coordinates",
        FormField::StartDate | FormField::EndDate => "YYYY-MM-DD",
    };
    let text = Text::new(&label)
        .with_initial_value(initial)
        .with_placeholder(placeholder);
    cancelled(text.prompt())
}

pub fn yes_no(message: &str) -> Result<Option<bool>> {
    cancelled(inquire::Confirm::new(message).with_default(false).prompt())
}

/// Delete confirmation handed to the controller. Anything but an explicit
/// "yes" declines.
pub fn confirm(message: &str) -> bool {
    matches!(yes_no(message), Ok(Some(true)))
}
