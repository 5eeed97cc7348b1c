//! Utilities shared across the crate.

pub mod cli;
pub mod config;
pub mod form;
pub mod http;
pub mod logging;
