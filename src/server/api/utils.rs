//! Response helpers shared by the milestone endpoints
use actix_web::http::header::{ContentType, LOCATION};
use actix_web::HttpResponse;

use crate::milestones::render::Message;
use crate::server::flash;

/// Rendered HTML page. Clears the flash cookie once `shown` messages are on the page.
#[must_use]
pub fn html_page(shown: &[Message], body: String) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.insert_header(ContentType::html());
    if !shown.is_empty() {
        flash::clear(&mut response);
    }
    response.body(body)
}

/// `303 See Other` to `location`, carrying `messages` to the next page.
///
/// # Errors
/// Errors if the messages cannot be stored.
pub fn redirect_with(location: &str, messages: &[Message]) -> anyhow::Result<HttpResponse> {
    let mut response = HttpResponse::SeeOther();
    response.insert_header((LOCATION, location.to_owned()));
    flash::store(&mut response, messages)?;
    Ok(response.finish())
}

/// URL of an article's milestones tab.
#[must_use]
pub fn article_tab_url(slug: &str, article_id: i64) -> String {
    format!("/article/{article_id}/_plugin/{slug}/")
}

/// URL of a milestone's edit form.
#[must_use]
pub fn edit_url(slug: &str, article_id: i64, milestone_id: i64) -> String {
    format!("/article/{article_id}/_plugin/{slug}/edit/{milestone_id}/")
}

/// URL of the batch editor.
#[must_use]
pub fn batch_url(slug: &str) -> String {
    format!("/{slug}/batch/")
}
