//! Handler expanding `[milestones]` directives in a document.
use actix_web::http::header::ContentType;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::{
    milestones::{self, directive, errors::MilestoneError},
    server::errors::error_response,
};

use super::auth;
use super::state::{App as AppState, Global as _};

/// Expand every directive of the plain-text document in the request body.
#[tracing::instrument(skip(req, data, body))]
pub async fn expand(req: HttpRequest, data: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    expand_document(&req, &data, &body)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

async fn expand_document(
    req: &HttpRequest,
    state: &AppState,
    body: &[u8],
) -> anyhow::Result<HttpResponse> {
    auth::optional_user(req, state).await?;
    let text = std::str::from_utf8(body)
        .map_err(|_| MilestoneError::Validation("document is not valid UTF-8".to_owned()))?;
    let expanded = directive::expand(
        state.db(),
        state.renderer(),
        text,
        milestones::today(),
        state.config().milestones.default_days,
    )
    .await?;
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(expanded))
}
