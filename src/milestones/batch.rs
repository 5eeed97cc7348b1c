//! All-or-nothing updates of several milestones at once.
use crate::db::models::milestone;
use crate::db::{DatabaseConnection, Tx as _};

use super::errors::MilestoneError;
use super::forms::{BatchAction, BatchRequest};

/// Result of a batch submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Status changed on this many milestones.
    Updated(u64),
    /// This many milestones were flagged as deleted.
    Deleted(u64),
    /// Some selected milestone belongs to somebody else. Nothing changed.
    Rejected,
}

impl BatchOutcome {
    /// Message shown to the requester.
    #[must_use]
    pub fn message(&self) -> String {
        match *self {
            Self::Updated(_) => "Milestones updated".to_owned(),
            Self::Deleted(_) => "Milestones deleted".to_owned(),
            Self::Rejected => MilestoneError::Ownership.to_string(),
        }
    }
}

/// Apply `request` on behalf of `owner_id`.
///
/// The ownership check and the update run in one transaction, so either every
/// selected milestone changes or none does.
///
/// # Errors
/// Errors if the database cannot be queried or updated.
#[tracing::instrument(skip(db))]
pub async fn apply(
    db: &DatabaseConnection,
    owner_id: i64,
    request: &BatchRequest,
) -> anyhow::Result<BatchOutcome> {
    let mut tx = db.begin().await?;
    let foreign =
        milestone::TxManager::count_not_owned_by(&mut tx, &request.selected, owner_id).await?;
    if foreign > 0 {
        tracing::info!(foreign, "Rejected batch with milestones of other owners");
        tx.rollback().await?;
        return Ok(BatchOutcome::Rejected);
    }
    let outcome = match request.action {
        BatchAction::SetStatus(status) => BatchOutcome::Updated(
            milestone::TxManager::set_status_in(&mut tx, &request.selected, status).await?,
        ),
        BatchAction::Delete => BatchOutcome::Deleted(
            milestone::TxManager::soft_delete_in(&mut tx, &request.selected).await?,
        ),
    };
    tx.commit().await?;
    Ok(outcome)
}
