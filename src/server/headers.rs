//! Headers used by the milestones server.

/// Username of the requesting user, set by the authenticating proxy in front of the service.
///
/// Example:
///
/// `X-Remote-User: ada`
pub const HTTP_X_REMOTE_USER: &str = "X-Remote-User";
