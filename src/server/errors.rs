//! Mapping of errors to HTTP responses.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;

use crate::milestones::errors::MilestoneError;

/// Generic error bodies for responses that carry no domain detail.
#[derive(Debug, Display)]
pub enum HTTPError {
    /// 404
    #[display(fmt = "Not found")]
    NotFound,
    /// 500
    #[display(fmt = "Internal server error")]
    InternalServerError,
}

impl ResponseError for MilestoneError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::ArticleNotFound(_) | Self::MilestoneNotFound(_) => StatusCode::NOT_FOUND,
            Self::NoCurrentRevision | Self::Ownership | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Response for an error returned by the milestone operations.
///
/// Domain errors keep their status and message. Anything else is logged and
/// answered with a bare 500.
#[must_use]
pub fn error_response(err: &anyhow::Error) -> HttpResponse {
    if let Some(milestone_err) = err.downcast_ref::<MilestoneError>() {
        tracing::debug!("{milestone_err}");
        return milestone_err.error_response();
    }
    tracing::error!("Error: {err:?}");
    HttpResponse::InternalServerError().body(HTTPError::InternalServerError.to_string())
}
