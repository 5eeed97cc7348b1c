use async_trait::async_trait;
use serde::Serialize;
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for looking up wiki users.
#[async_trait]
pub trait Manager {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Find all active users ordered by first and last name.
    /// These are the users milestones can be assigned to.
    async fn find_all_active(&self) -> anyhow::Result<Vec<User>>;
    /// Find all active, non-staff users ordered by first name.
    /// Calendar colours are handed out in this order.
    async fn find_all_active_non_staff(&self) -> anyhow::Result<Vec<User>>;
}

/// Trait for managing users inside a transaction.
#[async_trait]
pub trait TxManager {
    /// Create a new user.
    async fn create(&mut self, user: &NewUser) -> anyhow::Result<Option<i64>>;
}

/// Model for a wiki user.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Inactive users cannot own milestones.
    pub is_active: bool,
    /// Staff users are left out of the calendar colour assignment.
    pub is_staff: bool,
}

impl User {
    /// First and last name separated by a space, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    /// Full name, or the username when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }
}

impl FromRow<'_, AnyRow> for User {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_active: row.try_get::<i64, _>("is_active")? != 0,
            is_staff: row.try_get::<i64, _>("is_staff")? != 0,
        })
    }
}

/// Values for a user insert.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the user can log in.
    pub is_active: bool,
    /// Whether the user is staff.
    pub is_staff: bool,
}

impl NewUser {
    /// An active, non-staff user.
    #[must_use]
    pub fn new(username: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            username: username.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            is_active: true,
            is_staff: false,
        }
    }
}
