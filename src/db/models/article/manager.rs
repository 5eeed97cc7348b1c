//! Manager for the article and article revision models.
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;

use super::{Article, ArticleRevision, NewRevision};

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find an article by id.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Article>> {
        let statement = "
            SELECT *
            FROM article
            WHERE id = $1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Article>(statement)
                    .bind(id)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find all revisions of an article, newest first.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_revisions(&self, article_id: i64) -> anyhow::Result<Vec<ArticleRevision>> {
        let statement = "
            SELECT *
            FROM article_revision
            WHERE article_id = $1
            ORDER BY revision_number DESC
        ";
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, ArticleRevision>(statement)
                    .bind(article_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }
}

#[async_trait]
impl super::TxManager for DatabaseTransaction {
    /// Insert a new article into the database.
    ///
    /// # Errors
    /// Errors if the article cannot be inserted into the database.
    async fn create(&mut self, title: &str) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO article ( title )
            VALUES ( $1 )
            RETURNING id
        ";
        let id = sqlx::query_scalar::<_, i64>(statement)
            .bind(title)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id)
    }

    /// Find an article by id.
    ///
    /// # Errors
    /// Errors if the query fails.
    async fn find_by_id(&mut self, id: i64) -> anyhow::Result<Option<Article>> {
        let statement = "
            SELECT *
            FROM article
            WHERE id = $1
        ";
        let row = sqlx::query_as::<_, Article>(statement)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    /// Find the article's current revision.
    ///
    /// # Errors
    /// Errors if the query fails.
    async fn find_current_revision(
        &mut self,
        article_id: i64,
    ) -> anyhow::Result<Option<ArticleRevision>> {
        let statement = "
            SELECT r.*
            FROM article a
            JOIN article_revision r ON r.id = a.current_revision_id
            WHERE a.id = $1
        ";
        let row = sqlx::query_as::<_, ArticleRevision>(statement)
            .bind(article_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    /// Append a revision and move the article's current revision pointer to it.
    ///
    /// # Errors
    /// Errors if the revision cannot be inserted or the article cannot be updated.
    async fn add_revision(
        &mut self,
        article_id: i64,
        revision: &NewRevision,
    ) -> anyhow::Result<i64> {
        let predecessor = super::TxManager::find_current_revision(self, article_id).await?;
        let (revision_number, title, content) = match predecessor {
            Some(previous) => (
                previous.revision_number + 1,
                previous.title,
                previous.content,
            ),
            None => (1, revision.title.clone(), revision.content.clone()),
        };
        let statement = "
            INSERT INTO article_revision
                ( article_id, revision_number, title, content, automatic_log, user_id, ip_address, locked )
            VALUES ( $1, $2, $3, $4, $5, $6, $7, 0 )
            RETURNING id
        ";
        let revision_id = sqlx::query_scalar::<_, i64>(statement)
            .bind(article_id)
            .bind(revision_number)
            .bind(title)
            .bind(content)
            .bind(revision.automatic_log.clone())
            .bind(revision.user_id)
            .bind(revision.ip_address.clone())
            .fetch_one(&mut *self.tx)
            .await?;
        let statement = "
            UPDATE article
            SET current_revision_id = $1
            WHERE id = $2
        ";
        sqlx::query(statement)
            .bind(revision_id)
            .bind(article_id)
            .execute(&mut *self.tx)
            .await?;
        tracing::debug!(article_id, revision_id, revision_number, "Added article revision");
        Ok(revision_id)
    }

    /// Set the locked flag on a revision.
    ///
    /// # Errors
    /// Errors if the revision cannot be updated.
    async fn set_revision_locked(&mut self, revision_id: i64, locked: bool) -> anyhow::Result<()> {
        let statement = "
            UPDATE article_revision
            SET locked = $1
            WHERE id = $2
        ";
        sqlx::query(statement)
            .bind(i64::from(locked))
            .bind(revision_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}
