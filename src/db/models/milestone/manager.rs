//! Manager for the milestone model.
use crate::db::models::status::Status;
use crate::db::{DatabaseConnection, DatabaseKind, DatabaseTransaction};
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    Listing, ListingFilter, Milestone, MilestoneChanges, NewMilestone, DATE_FORMAT, TIME_FORMAT,
};

/// Columns and joins shared by every query returning a [`Listing`].
const LISTING_SELECT: &str = "
    SELECT m.id, m.article_id, m.article_revision_id, m.owner_id, m.title, m.status,
           m.date, m.time, m.deleted, m.created, m.modified,
           u.username AS owner_username,
           u.first_name AS owner_first_name,
           u.last_name AS owner_last_name,
           a.title AS article_title
    FROM milestone m
    JOIN wiki_user u ON u.id = m.owner_id
    JOIN article a ON a.id = m.article_id
";

/// Display order. Milestones without a time sort first within their day.
const LISTING_ORDER: &str = "ORDER BY m.date, m.time, m.id";

/// Numbered placeholders `$first, $first+1, ...` for `count` bound values.
fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|idx| format!("${idx}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a date the way it is stored.
fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl super::Manager for DatabaseConnection {
    /// Find a milestone by id.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Milestone>> {
        let statement = "
            SELECT *
            FROM milestone
            WHERE id = $1
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Milestone>(statement)
                    .bind(id)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find a milestone by id and article.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_by_id_and_article(
        &self,
        id: i64,
        article_id: i64,
    ) -> anyhow::Result<Option<Milestone>> {
        let statement = "
            SELECT *
            FROM milestone
            WHERE id = $1 AND article_id = $2
        ";
        let row = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Milestone>(statement)
                    .bind(id)
                    .bind(article_id)
                    .fetch_optional(&mut *connection)
                    .await?
            }
        };
        Ok(row)
    }

    /// Find every milestone of an article.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_all_by_article(&self, article_id: i64) -> anyhow::Result<Vec<Listing>> {
        let statement = format!("{LISTING_SELECT} WHERE m.article_id = $1 {LISTING_ORDER}");
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Listing>(&statement)
                    .bind(article_id)
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find the open milestones of an owner.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    async fn find_open_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Listing>> {
        let statement = format!(
            "{LISTING_SELECT}
            WHERE m.owner_id = $1 AND m.deleted = 0 AND m.status IN ($2, $3)
            {LISTING_ORDER}"
        );
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Listing>(&statement)
                    .bind(owner_id)
                    .bind(Status::Pending.to_int())
                    .bind(Status::Active.to_int())
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find the milestones a directive lists.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    #[tracing::instrument(level = "trace", skip(self))]
    async fn find_listed(
        &self,
        filter: &ListingFilter,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<Listing>> {
        let listed = Status::LISTED.len();
        let statement = format!(
            "{LISTING_SELECT}
            WHERE m.deleted = 0
              AND m.status IN ({})
              AND NOT (m.status = ${} AND m.date < ${})
              AND (${owner} IS NULL OR u.username = ${owner})
              AND (${from} IS NULL OR m.date >= ${from})
              AND (${to} IS NULL OR m.date <= ${to})
            {LISTING_ORDER}",
            placeholders(1, listed),
            listed + 1,
            listed + 2,
            owner = listed + 3,
            from = listed + 4,
            to = listed + 5,
        );
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                let mut query = sqlx::query_as::<_, Listing>(&statement);
                for status in Status::LISTED {
                    query = query.bind(status.to_int());
                }
                query
                    .bind(Status::Informational.to_int())
                    .bind(format_date(today))
                    .bind(filter.owner.clone())
                    .bind(filter.date_from.map(format_date))
                    .bind(filter.date_to.map(format_date))
                    .fetch_all(&mut *connection)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Find the milestones shown on the calendar.
    ///
    /// # Errors
    /// Errors if can't establish a connection to the database.
    #[tracing::instrument(level = "trace", skip(self))]
    async fn find_for_calendar(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        article_id: Option<i64>,
    ) -> anyhow::Result<Vec<Listing>> {
        let statement = format!(
            "{LISTING_SELECT}
            WHERE m.deleted = 0
              AND m.status != $1
              AND m.date >= $2
              AND m.date <= $3
              AND ($4 IS NULL OR m.article_id = $4)
            {LISTING_ORDER}"
        );
        let rows = match self.kind {
            DatabaseKind::Sqlite => {
                let mut connection = self.pool.acquire().await?;
                sqlx::query_as::<_, Listing>(&statement)
                    .bind(Status::Cancelled.to_int())
                    .bind(format_date(start))
                    .bind(format_date(end))
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
    /// Find a milestone by id and article.
    ///
    /// # Errors
    /// Errors if the query fails.
    async fn find_by_id_and_article(
        &mut self,
        id: i64,
        article_id: i64,
    ) -> anyhow::Result<Option<Milestone>> {
        let statement = "
            SELECT *
            FROM milestone
            WHERE id = $1 AND article_id = $2
        ";
        let row = sqlx::query_as::<_, Milestone>(statement)
            .bind(id)
            .bind(article_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    /// Insert a new milestone into the database.
    ///
    /// # Errors
    /// Errors if the milestone cannot be inserted into the database.
    async fn create(&mut self, milestone: &NewMilestone) -> anyhow::Result<Option<i64>> {
        let statement = "
            INSERT INTO milestone
                ( article_id, article_revision_id, owner_id, title, status, date, time, deleted )
            VALUES ( $1, $2, $3, $4, $5, $6, $7, 0 )
            RETURNING id
        ";
        let id = sqlx::query_scalar::<_, i64>(statement)
            .bind(milestone.article_id)
            .bind(milestone.article_revision_id)
            .bind(milestone.owner_id)
            .bind(milestone.title.clone())
            .bind(milestone.status.to_int())
            .bind(format_date(milestone.date))
            .bind(milestone.time.map(|time| time.format(TIME_FORMAT).to_string()))
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id)
    }

    /// Rewrite the editable fields of a milestone.
    ///
    /// # Errors
    /// Errors if the milestone cannot be updated.
    async fn update(&mut self, id: i64, changes: &MilestoneChanges) -> anyhow::Result<()> {
        let statement = "
            UPDATE milestone
            SET article_revision_id = $1,
                owner_id = $2,
                title = $3,
                status = $4,
                date = $5,
                time = $6,
                deleted = $7,
                modified = CURRENT_TIMESTAMP
            WHERE id = $8
        ";
        sqlx::query(statement)
            .bind(changes.article_revision_id)
            .bind(changes.owner_id)
            .bind(changes.title.clone())
            .bind(changes.status.to_int())
            .bind(format_date(changes.date))
            .bind(changes.time.map(|time| time.format(TIME_FORMAT).to_string()))
            .bind(i64::from(changes.deleted))
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Count how many of the given milestones are owned by somebody else.
    ///
    /// Ids that match no milestone are not counted.
    ///
    /// # Errors
    /// Errors if the query fails.
    async fn count_not_owned_by(&mut self, ids: &[i64], owner_id: i64) -> anyhow::Result<i64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let statement = format!(
            "SELECT COUNT(*) AS count FROM milestone WHERE owner_id != $1 AND id IN ({})",
            placeholders(2, ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&statement).bind(owner_id);
        for id in ids {
            query = query.bind(*id);
        }
        let count = query.fetch_one(&mut *self.tx).await?;
        Ok(count)
    }

    /// Set the status of all given milestones.
    ///
    /// # Errors
    /// Errors if the milestones cannot be updated.
    async fn set_status_in(&mut self, ids: &[i64], status: Status) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let statement = format!(
            "UPDATE milestone SET status = $1, modified = CURRENT_TIMESTAMP WHERE id IN ({})",
            placeholders(2, ids.len())
        );
        let mut query = sqlx::query(&statement).bind(status.to_int());
        for id in ids {
            query = query.bind(*id);
        }
        let affected = query.execute(&mut *self.tx).await?.rows_affected();
        Ok(affected)
    }

    /// Flag all given milestones as deleted.
    ///
    /// # Errors
    /// Errors if the milestones cannot be updated.
    async fn soft_delete_in(&mut self, ids: &[i64]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let statement = format!(
            "UPDATE milestone SET deleted = 1, modified = CURRENT_TIMESTAMP WHERE id IN ({})",
            placeholders(1, ids.len())
        );
        let mut query = sqlx::query(&statement);
        for id in ids {
            query = query.bind(*id);
        }
        let affected = query.execute(&mut *self.tx).await?.rows_affected();
        Ok(affected)
    }
}
