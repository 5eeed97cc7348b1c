//! Errors raised by milestone operations.
use derive_more::Display;

/// Domain errors, carried inside `anyhow::Error` and mapped to HTTP responses by the server.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum MilestoneError {
    /// No article with this id.
    #[display(fmt = "Article {} does not exist.", _0)]
    ArticleNotFound(i64),
    /// No milestone with this id on the article.
    #[display(fmt = "Milestone {} does not exist.", _0)]
    MilestoneNotFound(i64),
    /// Milestones can only be created once the article has a revision.
    #[display(fmt = "Article does not have a current_revision set.")]
    NoCurrentRevision,
    /// A batch selected milestones owned by somebody else.
    #[display(
        fmt = "Milestone ownership error. You are not currently the owner of all submitted milestones."
    )]
    Ownership,
    /// The article's current revision is locked.
    #[display(fmt = "This article is locked for editing.")]
    Forbidden,
    /// No known user made the request.
    #[display(fmt = "Authentication required.")]
    Unauthorized,
    /// A request parameter could not be understood.
    #[display(fmt = "Invalid request: {}", _0)]
    Validation(String),
}

impl std::error::Error for MilestoneError {}
