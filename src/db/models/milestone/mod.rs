use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::{any::AnyRow, FromRow, Row as _};

use super::status::Status;

pub mod manager;

/// Storage format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format of the `time` column.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Trait for reading milestones.
#[async_trait]
pub trait Manager {
    /// Find a milestone by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Milestone>>;
    /// Find a milestone by id, only if it belongs to the given article.
    async fn find_by_id_and_article(
        &self,
        id: i64,
        article_id: i64,
    ) -> anyhow::Result<Option<Milestone>>;
    /// Find every milestone of an article, deleted ones included, in display order.
    async fn find_all_by_article(&self, article_id: i64) -> anyhow::Result<Vec<Listing>>;
    /// Find the pending and active milestones of an owner that are not deleted.
    async fn find_open_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Listing>>;
    /// Find the milestones a `[milestones]` directive lists.
    ///
    /// Only pending, active and informational milestones that are not deleted qualify,
    /// and informational milestones dated before `today` are left out.
    async fn find_listed(
        &self,
        filter: &ListingFilter,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<Listing>>;
    /// Find the milestones shown on the calendar between `start` and `end` inclusive.
    /// Cancelled and deleted milestones are left out.
    async fn find_for_calendar(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        article_id: Option<i64>,
    ) -> anyhow::Result<Vec<Listing>>;
}

/// Trait for writing milestones inside a transaction.
#[async_trait]
pub trait TxManager {
    /// Find a milestone by id, only if it belongs to the given article.
    async fn find_by_id_and_article(
        &mut self,
        id: i64,
        article_id: i64,
    ) -> anyhow::Result<Option<Milestone>>;
    /// Insert a new milestone.
    async fn create(&mut self, milestone: &NewMilestone) -> anyhow::Result<Option<i64>>;
    /// Rewrite the editable fields of a milestone.
    async fn update(&mut self, id: i64, changes: &MilestoneChanges) -> anyhow::Result<()>;
    /// Count how many of the given milestones are owned by somebody else.
    async fn count_not_owned_by(&mut self, ids: &[i64], owner_id: i64) -> anyhow::Result<i64>;
    /// Set the status of all given milestones.
    async fn set_status_in(&mut self, ids: &[i64], status: Status) -> anyhow::Result<u64>;
    /// Flag all given milestones as deleted.
    async fn soft_delete_in(&mut self, ids: &[i64]) -> anyhow::Result<u64>;
}

/// Model for a milestone.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    /// Primary key.
    pub id: i64,
    /// Foreign key to the article the milestone belongs to.
    pub article_id: i64,
    /// Foreign key to the article revision written when the milestone was last saved.
    pub article_revision_id: i64,
    /// Foreign key to the owning user.
    pub owner_id: i64,
    /// Short description, at most 200 characters.
    pub title: String,
    /// Current status.
    pub status: Status,
    /// Day the milestone falls on.
    pub date: NaiveDate,
    /// Optional time of day. Milestones without a time are all-day.
    pub time: Option<NaiveTime>,
    /// Soft delete flag.
    pub deleted: bool,
    /// Creation timestamp.
    pub created: String,
    /// Last modification timestamp.
    pub modified: String,
}

impl Milestone {
    /// `danger` when the milestone is in the past and not merely informational.
    #[must_use]
    pub fn overdue_class(&self, today: NaiveDate) -> Option<&'static str> {
        (self.date < today && self.status != Status::Informational).then_some("danger")
    }

    /// CSS classes hiding finished, deleted and stale informational milestones by default.
    #[must_use]
    pub fn status_class(&self, today: NaiveDate) -> String {
        let mut class = String::new();
        if self.deleted {
            class.push_str(" deleted");
        }
        let stale_informational = self.status == Status::Informational && self.date < today;
        if matches!(self.status, Status::Completed | Status::Cancelled)
            || self.deleted
            || stale_informational
        {
            class.push_str(" default-hide");
        }
        class
    }
}

/// Wrap a chrono parse failure as a column decode error.
fn decode_error(column: &str, err: chrono::ParseError) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_owned(),
        source: Box::new(err),
    }
}

/// NOTE: the `Any` driver of the current sqlx version cannot decode NULL into an `Option`,
/// so nullable columns are read with `.ok()`.
impl FromRow<'_, AnyRow> for Milestone {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        let status_code: i64 = row.try_get("status")?;
        let status = Status::from_int(status_code).map_err(|err| sqlx::Error::ColumnDecode {
            index: "status".to_owned(),
            source: err.into(),
        })?;
        let raw_date: String = row.try_get("date")?;
        let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
            .map_err(|err| decode_error("date", err))?;
        let raw_time: Option<String> = row.try_get("time").ok();
        let time = raw_time
            .filter(|raw| !raw.is_empty())
            .map(|raw| NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f"))
            .transpose()
            .map_err(|err| decode_error("time", err))?;
        Ok(Self {
            id: row.try_get("id")?,
            article_id: row.try_get("article_id")?,
            article_revision_id: row.try_get("article_revision_id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            status,
            date,
            time,
            deleted: row.try_get::<i64, _>("deleted")? != 0,
            created: row.try_get("created")?,
            modified: row.try_get("modified")?,
        })
    }
}

/// A milestone joined with the names needed to display it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// The milestone itself.
    pub milestone: Milestone,
    /// Username of the owner.
    pub owner_username: String,
    /// Full name of the owner, falling back to the username.
    pub owner_name: String,
    /// Title of the article the milestone belongs to.
    pub article_title: String,
}

impl FromRow<'_, AnyRow> for Listing {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        let owner_username: String = row.try_get("owner_username")?;
        let first_name: String = row.try_get("owner_first_name")?;
        let last_name: String = row.try_get("owner_last_name")?;
        let full_name = format!("{first_name} {last_name}").trim().to_owned();
        let owner_name = if full_name.is_empty() {
            owner_username.clone()
        } else {
            full_name
        };
        Ok(Self {
            milestone: Milestone::from_row(row)?,
            owner_username,
            owner_name,
            article_title: row.try_get("article_title")?,
        })
    }
}

/// Optional constraints on a directive listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Only milestones owned by this username.
    pub owner: Option<String>,
    /// Only milestones on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Only milestones on or before this date.
    pub date_to: Option<NaiveDate>,
}

/// Values for a milestone insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMilestone {
    /// Owning article.
    pub article_id: i64,
    /// Revision the milestone was created in.
    pub article_revision_id: i64,
    /// Owning user.
    pub owner_id: i64,
    /// Short description.
    pub title: String,
    /// Initial status.
    pub status: Status,
    /// Day.
    pub date: NaiveDate,
    /// Optional time of day.
    pub time: Option<NaiveTime>,
}

/// Editable fields written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneChanges {
    /// Revision written for this update.
    pub article_revision_id: i64,
    /// New owner.
    pub owner_id: i64,
    /// New title.
    pub title: String,
    /// New status.
    pub status: Status,
    /// New day.
    pub date: NaiveDate,
    /// New time of day.
    pub time: Option<NaiveTime>,
    /// New soft delete flag.
    pub deleted: bool,
}
