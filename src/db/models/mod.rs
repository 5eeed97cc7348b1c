//! This module contains all the sqlx structs for the database tables.

/// sqlx structs for article and article_revision tables.
pub mod article;
/// sqlx structs for milestone table.
pub mod milestone;
/// Milestone status codes.
pub mod status;
/// sqlx structs for wiki_user table.
pub mod user;
