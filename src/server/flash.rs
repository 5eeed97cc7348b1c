//! One-shot messages carried to the next page in a cookie.
//!
//! The cookie holds a JSON list of [`Message`]s. Reading a page clears the cookie.
use actix_web::cookie::Cookie;
use actix_web::http::header::SET_COOKIE;
use actix_web::{HttpRequest, HttpResponseBuilder};

use crate::milestones::render::Message;

/// Name of the flash cookie.
pub const FLASH_COOKIE: &str = "milestones_messages";

/// Messages stored in the request's flash cookie. Unreadable cookies yield nothing.
#[must_use]
pub fn read(req: &HttpRequest) -> Vec<Message> {
    req.cookie(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Store `messages` for the next page.
///
/// # Errors
/// Errors if the messages cannot be serialized.
pub fn store(response: &mut HttpResponseBuilder, messages: &[Message]) -> anyhow::Result<()> {
    let json = serde_json::to_string(messages)?;
    let cookie = Cookie::build(FLASH_COOKIE, json)
        .path("/")
        .http_only(true)
        .finish();
    // `HttpResponseBuilder::cookie` does not percent-encode, but requests decode cookie values.
    response.append_header((SET_COOKIE, cookie.encoded().to_string()));
    Ok(())
}

/// Drop the flash cookie once its messages have been shown.
pub fn clear(response: &mut HttpResponseBuilder) {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    response.cookie(cookie);
}
