use async_trait::async_trait;
use serde::Serialize;
use sqlx::{any::AnyRow, FromRow, Row as _};

pub mod manager;

/// Trait for reading articles.
#[async_trait]
pub trait Manager {
    /// Find an article by id.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Article>>;
    /// Find all revisions of an article, newest first.
    async fn find_revisions(&self, article_id: i64) -> anyhow::Result<Vec<ArticleRevision>>;
}

/// Trait for managing articles and their revisions inside a transaction.
#[async_trait]
pub trait TxManager {
    /// Create an article without any revision.
    async fn create(&mut self, title: &str) -> anyhow::Result<Option<i64>>;
    /// Find an article by id.
    async fn find_by_id(&mut self, id: i64) -> anyhow::Result<Option<Article>>;
    /// Find the article's current revision, if one has been set.
    async fn find_current_revision(
        &mut self,
        article_id: i64,
    ) -> anyhow::Result<Option<ArticleRevision>>;
    /// Append a revision that inherits its predecessor's title and content, then make it current.
    async fn add_revision(
        &mut self,
        article_id: i64,
        revision: &NewRevision,
    ) -> anyhow::Result<i64>;
    /// Set the locked flag on a revision.
    async fn set_revision_locked(&mut self, revision_id: i64, locked: bool) -> anyhow::Result<()>;
}

/// Model for an article.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Primary key.
    pub id: i64,
    /// Article title.
    pub title: String,
    /// Foreign key to the current revision, unset until the first revision is added.
    pub current_revision_id: Option<i64>,
}

/// NOTE: the `Any` driver of the current sqlx version cannot decode NULL into an `Option`,
/// so nullable columns are read with `.ok()`.
impl FromRow<'_, AnyRow> for Article {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            current_revision_id: row.try_get("current_revision_id").ok(),
        })
    }
}

/// Model for an article revision.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArticleRevision {
    /// Primary key.
    pub id: i64,
    /// Foreign key to the article.
    pub article_id: i64,
    /// Incrementing number within the article, starting at 1.
    pub revision_number: i64,
    /// Article title at this revision.
    pub title: String,
    /// Article content at this revision.
    pub content: String,
    /// Log message written by the system for this revision.
    pub automatic_log: String,
    /// User that created the revision, unset for anonymous edits.
    pub user_id: Option<i64>,
    /// Client address of the request that created the revision.
    pub ip_address: Option<String>,
    /// Locked revisions cannot be edited.
    pub locked: bool,
    /// Creation timestamp.
    pub created: String,
}

impl FromRow<'_, AnyRow> for ArticleRevision {
    fn from_row(row: &AnyRow) -> anyhow::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            article_id: row.try_get("article_id")?,
            revision_number: row.try_get("revision_number")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            automatic_log: row.try_get("automatic_log")?,
            user_id: row.try_get("user_id").ok(),
            ip_address: row.try_get("ip_address").ok(),
            locked: row.try_get::<i64, _>("locked")? != 0,
            created: row.try_get("created")?,
        })
    }
}

/// Values for a new revision.
///
/// When the article already has a revision, `title` and `content` are ignored
/// and carried over from the predecessor instead.
#[derive(Debug, Clone, Default)]
pub struct NewRevision {
    /// Title for a first revision.
    pub title: String,
    /// Content for a first revision.
    pub content: String,
    /// Log message.
    pub automatic_log: String,
    /// Acting user.
    pub user_id: Option<i64>,
    /// Client address.
    pub ip_address: Option<String>,
}
