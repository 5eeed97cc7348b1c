//! Validation of submitted milestone and batch forms.
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::models::status::Status;
use crate::db::models::user::User;
use crate::utils::form::FormData;

/// Longest allowed milestone title, in characters.
pub const TITLE_MAX_LENGTH: usize = 200;

/// Accepted date input formats, tried in order.
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];
/// Accepted time input formats, tried in order.
const TIME_INPUT_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Message for a missing required field.
const REQUIRED: &str = "This field is required.";
/// Message for a choice outside the allowed set.
const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Per-field and form-wide validation messages.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FormErrors {
    /// Messages keyed by field name.
    pub fields: BTreeMap<String, Vec<String>>,
    /// Messages not tied to one field.
    pub non_field: Vec<String>,
}

impl FormErrors {
    /// Record a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    /// Whether no message has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

/// Which milestone form is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Creation form, with an optional `end_date` for one milestone per day.
    Create,
    /// Edit form, with the `deleted` flag instead of `end_date`.
    Edit,
}

/// Cleaned values of a valid milestone form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneInput {
    /// Owning user, one of the offered owners.
    pub owner_id: i64,
    /// Title.
    pub title: String,
    /// Status.
    pub status: Status,
    /// Day of the (first) milestone.
    pub date: NaiveDate,
    /// Optional time of day.
    pub time: Option<NaiveTime>,
    /// Last day of a range, always after `date`. Create form only.
    pub end_date: Option<NaiveDate>,
    /// Soft delete flag. Edit form only.
    pub deleted: bool,
}

/// Parse a date in any accepted input format.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parse a time in any accepted input format.
#[must_use]
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

/// Validate a milestone form.
///
/// `owners` are the users a milestone may be assigned to.
///
/// # Errors
/// Returns every validation message when any field is invalid.
pub fn clean_milestone(
    data: &FormData,
    kind: FormKind,
    owners: &[User],
) -> Result<MilestoneInput, FormErrors> {
    let mut errors = FormErrors::default();

    let owner_id = match data.get("owner") {
        None => {
            errors.add("owner", REQUIRED);
            None
        }
        Some(raw) => {
            let owner = raw
                .parse::<i64>()
                .ok()
                .filter(|id| owners.iter().any(|owner| owner.id == *id));
            if owner.is_none() {
                errors.add("owner", INVALID_CHOICE);
            }
            owner
        }
    };

    let title = match data.get("title") {
        None => {
            errors.add("title", REQUIRED);
            None
        }
        Some(raw) => {
            let length = raw.chars().count();
            if length > TITLE_MAX_LENGTH {
                errors.add(
                    "title",
                    format!(
                        "Ensure this value has at most {TITLE_MAX_LENGTH} characters (it has {length})."
                    ),
                );
                None
            } else {
                Some(raw.to_owned())
            }
        }
    };

    let status = match data.get("status") {
        None => {
            errors.add("status", REQUIRED);
            None
        }
        Some(raw) => {
            let status = raw
                .parse::<i64>()
                .ok()
                .and_then(|code| Status::from_int(code).ok());
            if status.is_none() {
                errors.add(
                    "status",
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                );
            }
            status
        }
    };

    let date = required_date(data, "date", &mut errors);

    let time = data.get("time").and_then(|raw| {
        let time = parse_time(raw);
        if time.is_none() {
            errors.add("time", "Enter a valid time.");
        }
        time
    });

    let end_date = match kind {
        FormKind::Create => data.get("end_date").and_then(|raw| {
            let end_date = parse_date(raw);
            if end_date.is_none() {
                errors.add("end_date", "Enter a valid date.");
            }
            end_date
        }),
        FormKind::Edit => None,
    };

    if let (Some(start), Some(end)) = (date, end_date) {
        if end <= start {
            errors
                .non_field
                .push("End date must be greater than start date.".to_owned());
        }
    }

    let deleted = kind == FormKind::Edit && data.is_checked("deleted");

    match (owner_id, title, status, date) {
        (Some(owner_id), Some(title), Some(status), Some(date)) if errors.is_empty() => {
            Ok(MilestoneInput {
                owner_id,
                title,
                status,
                date,
                time,
                end_date,
                deleted,
            })
        }
        _ => Err(errors),
    }
}

/// A required date field.
fn required_date(data: &FormData, field: &str, errors: &mut FormErrors) -> Option<NaiveDate> {
    let Some(raw) = data.get(field) else {
        errors.add(field, REQUIRED);
        return None;
    };
    let date = parse_date(raw);
    if date.is_none() {
        errors.add(field, "Enter a valid date.");
    }
    date
}

/// Action applied to every milestone selected on the batch page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    /// Move the milestones to a status.
    SetStatus(Status),
    /// Soft delete the milestones.
    Delete,
}

impl BatchAction {
    /// Submitted value of the delete action.
    pub const DELETE_VALUE: &'static str = "delete_action";

    /// Every action offered on the batch page, in display order.
    pub const ALL: [Self; 5] = [
        Self::SetStatus(Status::Pending),
        Self::SetStatus(Status::Active),
        Self::SetStatus(Status::Completed),
        Self::SetStatus(Status::Cancelled),
        Self::Delete,
    ];

    /// Parse a submitted action value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.value() == value)
    }

    /// Submitted value.
    #[must_use]
    pub fn value(&self) -> String {
        match *self {
            Self::SetStatus(status) => status.to_int().to_string(),
            Self::Delete => Self::DELETE_VALUE.to_owned(),
        }
    }

    /// Label shown in the action selector.
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            Self::SetStatus(status) => format!("Set to {}", status.label()),
            Self::Delete => "Delete selected milestones".to_owned(),
        }
    }
}

/// Cleaned batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// What to do.
    pub action: BatchAction,
    /// Milestone ids to do it to.
    pub selected: Vec<i64>,
}

/// Validate a batch form.
///
/// # Errors
/// Returns validation messages when the action is missing or unknown, or a selected id is not a number.
pub fn clean_batch(data: &FormData) -> Result<BatchRequest, FormErrors> {
    let mut errors = FormErrors::default();
    let action = match data.get("action") {
        None => {
            errors.add("action", REQUIRED);
            None
        }
        Some(raw) => {
            let action = BatchAction::parse(raw);
            if action.is_none() {
                errors.add(
                    "action",
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                );
            }
            action
        }
    };
    let mut selected = Vec::new();
    for raw in data.get_all("_selected_action") {
        if let Ok(id) = raw.trim().parse::<i64>() {
            if !selected.contains(&id) {
                selected.push(id);
            }
        } else {
            errors.add("_selected_action", INVALID_CHOICE);
        }
    }
    match action {
        Some(action) if errors.is_empty() => Ok(BatchRequest { action, selected }),
        _ => Err(errors),
    }
}
