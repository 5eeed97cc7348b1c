//! The requesting user, as named by the authenticating proxy.
use actix_web::HttpRequest;

use crate::db::models::user::{self, User};
use crate::milestones::errors::MilestoneError;
use crate::milestones::lifecycle::Actor;
use crate::server::headers::HTTP_X_REMOTE_USER;
use crate::utils::http::client_ip;

use super::state::Global;

/// Username from the `X-Remote-User` header, if any.
fn remote_username(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(HTTP_X_REMOTE_USER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// The active user named by the request.
///
/// # Errors
/// Errors with [`MilestoneError::Unauthorized`] when the header is missing or
/// names no active user, or if the database cannot be queried.
pub async fn require_user<T: Global>(req: &HttpRequest, state: &T) -> anyhow::Result<User> {
    let Some(username) = remote_username(req) else {
        return Err(MilestoneError::Unauthorized.into());
    };
    user::Manager::find_by_username(state.db(), username)
        .await?
        .filter(|found| found.is_active)
        .ok_or_else(|| {
            tracing::info!(username, "Unknown or inactive remote user");
            MilestoneError::Unauthorized.into()
        })
}

/// The requesting user, or `None` for anonymous requests when the
/// configuration allows them.
///
/// A header naming an unknown user is always rejected.
///
/// # Errors
/// Errors with [`MilestoneError::Unauthorized`] when anonymous access is off
/// and no user was named, or the named user does not exist.
pub async fn optional_user<T: Global>(req: &HttpRequest, state: &T) -> anyhow::Result<Option<User>> {
    if remote_username(req).is_none() && state.config().milestones.allow_anonymous {
        return Ok(None);
    }
    require_user(req, state).await.map(Some)
}

/// The writer recorded on article revisions.
#[must_use]
pub fn actor(req: &HttpRequest, user: Option<User>) -> Actor {
    Actor {
        user,
        ip_address: client_ip(req),
    }
}
