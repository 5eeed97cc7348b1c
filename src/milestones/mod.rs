//! Milestone behaviour on top of the database models: form validation,
//! the `[milestones]` directive, batch updates, calendar colours and page rendering.

pub mod batch;
pub mod colors;
pub mod directive;
pub mod errors;
pub mod forms;
pub mod lifecycle;
pub mod range;
pub mod render;

/// The local calendar date that overdue checks and look-ahead windows are measured from.
#[must_use]
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
