//! This module contains the API endpoints for the server.
pub mod article;
pub mod auth;
pub mod batch;
pub mod calendar;
pub mod expand;
pub mod routes;
pub mod state;
pub mod utils;
