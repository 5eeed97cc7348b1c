//! Creating and editing milestones.
//!
//! Every write appends a revision to the owning article with an automatic log
//! message, and the milestone points at that revision afterwards.
use crate::db::models::article::{self, NewRevision};
use crate::db::models::milestone::{self, MilestoneChanges, NewMilestone};
use crate::db::models::user::User;
use crate::db::{DatabaseConnection, DatabaseTransaction, Tx as _};

use super::errors::MilestoneError;
use super::forms::MilestoneInput;
use super::range;

/// Who is writing, as recorded on the article revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    /// Requesting user, unset for anonymous writes.
    pub user: Option<User>,
    /// Client address.
    pub ip_address: Option<String>,
}

impl Actor {
    /// Name used in revision logs. Empty for anonymous writes.
    #[must_use]
    pub fn name(&self) -> String {
        self.user.as_ref().map(User::full_name).unwrap_or_default()
    }

    /// Revision for this actor with the given log message.
    fn revision(&self, automatic_log: String) -> NewRevision {
        NewRevision {
            automatic_log,
            user_id: self.user.as_ref().map(|user| user.id),
            ip_address: self.ip_address.clone(),
            ..NewRevision::default()
        }
    }
}

/// Create a milestone on an article, plus one copy per day up to `end_date` when given.
///
/// Returns the ids of the created milestones, the primary one first.
///
/// # Errors
/// Errors with [`MilestoneError::ArticleNotFound`], [`MilestoneError::NoCurrentRevision`]
/// or [`MilestoneError::Forbidden`], or if the database cannot be written.
#[tracing::instrument(skip(db, input, actor), fields(title = %input.title))]
pub async fn create_milestone(
    db: &DatabaseConnection,
    article_id: i64,
    input: &MilestoneInput,
    actor: &Actor,
) -> anyhow::Result<Vec<i64>> {
    let mut tx = db.begin().await?;
    match create_in(&mut tx, article_id, input, actor).await {
        Ok(ids) => {
            tx.commit().await?;
            tracing::info!(count = ids.len(), "Created milestones");
            Ok(ids)
        }
        Err(err) => {
            tx.rollback().await?;
            Err(err)
        }
    }
}

/// Creation steps inside one transaction.
async fn create_in(
    tx: &mut DatabaseTransaction,
    article_id: i64,
    input: &MilestoneInput,
    actor: &Actor,
) -> anyhow::Result<Vec<i64>> {
    let revision_id = add_log_revision(
        tx,
        article_id,
        actor,
        format!(
            "Milestone created by {}. Title: {}",
            actor.name(),
            input.title
        ),
    )
    .await?;

    let primary = NewMilestone {
        article_id,
        article_revision_id: revision_id,
        owner_id: input.owner_id,
        title: input.title.clone(),
        status: input.status,
        date: input.date,
        time: input.time,
    };
    let mut ids = vec![insert(tx, &primary).await?];
    if let Some(end_date) = input.end_date {
        for copy in range::copies(&primary, end_date) {
            ids.push(insert(tx, &copy).await?);
        }
    }
    Ok(ids)
}

/// Rewrite a milestone of an article.
///
/// # Errors
/// Errors with [`MilestoneError::MilestoneNotFound`], [`MilestoneError::NoCurrentRevision`]
/// or [`MilestoneError::Forbidden`], or if the database cannot be written.
#[tracing::instrument(skip(db, input, actor), fields(title = %input.title))]
pub async fn update_milestone(
    db: &DatabaseConnection,
    article_id: i64,
    milestone_id: i64,
    input: &MilestoneInput,
    actor: &Actor,
) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    match update_in(&mut tx, article_id, milestone_id, input, actor).await {
        Ok(()) => {
            tx.commit().await?;
            tracing::info!("Updated milestone");
            Ok(())
        }
        Err(err) => {
            tx.rollback().await?;
            Err(err)
        }
    }
}

/// Update steps inside one transaction.
async fn update_in(
    tx: &mut DatabaseTransaction,
    article_id: i64,
    milestone_id: i64,
    input: &MilestoneInput,
    actor: &Actor,
) -> anyhow::Result<()> {
    if milestone::TxManager::find_by_id_and_article(tx, milestone_id, article_id)
        .await?
        .is_none()
    {
        return Err(MilestoneError::MilestoneNotFound(milestone_id).into());
    }
    let action = if input.deleted { "deleted" } else { "updated" };
    let revision_id = add_log_revision(
        tx,
        article_id,
        actor,
        format!(
            "Milestone {action} by {}. Title: {} PK: {milestone_id}",
            actor.name(),
            input.title
        ),
    )
    .await?;
    let changes = MilestoneChanges {
        article_revision_id: revision_id,
        owner_id: input.owner_id,
        title: input.title.clone(),
        status: input.status,
        date: input.date,
        time: input.time,
        deleted: input.deleted,
    };
    milestone::TxManager::update(tx, milestone_id, &changes).await
}

/// Check the article can take a milestone write and append the log revision.
async fn add_log_revision(
    tx: &mut DatabaseTransaction,
    article_id: i64,
    actor: &Actor,
    automatic_log: String,
) -> anyhow::Result<i64> {
    if article::TxManager::find_by_id(tx, article_id).await?.is_none() {
        return Err(MilestoneError::ArticleNotFound(article_id).into());
    }
    let current = article::TxManager::find_current_revision(tx, article_id)
        .await?
        .ok_or(MilestoneError::NoCurrentRevision)?;
    if current.locked {
        return Err(MilestoneError::Forbidden.into());
    }
    article::TxManager::add_revision(tx, article_id, &actor.revision(automatic_log)).await
}

/// Insert one milestone and return its id.
async fn insert(tx: &mut DatabaseTransaction, milestone: &NewMilestone) -> anyhow::Result<i64> {
    milestone::TxManager::create(tx, milestone)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Milestone insert did not return an id"))
}
