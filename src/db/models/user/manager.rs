//! Manager for the user model.
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;

use super::{NewUser, User};

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find a user by username.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let statement = "
            SELECT *
            FROM wiki_user
            WHERE username = $1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, User>(statement)
                    .bind(username)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find all active users ordered by first and last name.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_active(&self) -> anyhow::Result<Vec<User>> {
        let statement = "
            SELECT *
            FROM wiki_user
            WHERE is_active = 1
            ORDER BY first_name, last_name, id
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, User>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find all active, non-staff users ordered by first name.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_active_non_staff(&self) -> anyhow::Result<Vec<User>> {
        let statement = "
            SELECT *
            FROM wiki_user
            WHERE is_active = 1 AND is_staff = 0
            ORDER BY first_name, id
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, User>(statement)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert a new user into the database.
    ///
    /// # Errors
    /// Errors if the user cannot be inserted into the database.
    async fn create(&mut self, user: &NewUser) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO wiki_user ( username, first_name, last_name, is_active, is_staff )
            VALUES ( $1, $2, $3, $4, $5 )
            RETURNING id
        ";
        let id = sqlx::query_scalar::<_, i64>(statement)
            .bind(&user.username)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(i64::from(user.is_active))
            .bind(i64::from(user.is_staff))
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id)
    }
}
