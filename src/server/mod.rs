//! HTTP interface of the milestones service.
//!
//! Serves the article milestones tab, the batch editor, the calendar and the
//! directive expansion endpoint.

pub mod api;
pub mod app;
pub mod errors;
pub mod flash;
pub mod headers;
pub mod tracing;
