//! Handlers for the batch editor of the requester's open milestones.
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::{
    db::models::{milestone, user::User},
    milestones::{
        self,
        batch::{self, BatchOutcome},
        forms::{self, FormErrors},
        render::{BatchPage, ErrorView, Message, MilestoneRow},
    },
    server::{errors::error_response, flash},
    utils::form::FormData,
};

use super::auth;
use super::state::{App as AppState, Global as _};
use super::utils::{batch_url, html_page, redirect_with};

/// List the requester's open milestones with the action selector.
#[tracing::instrument(skip(req, data))]
pub async fn list(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    show_list(&req, &data)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

/// Apply the chosen action to the selected milestones.
#[tracing::instrument(skip(req, data, body))]
pub async fn update(req: HttpRequest, data: web::Data<AppState>, body: web::Bytes) -> impl Responder {
    submit(&req, &data, &body)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

async fn show_list(req: &HttpRequest, state: &AppState) -> anyhow::Result<HttpResponse> {
    let user = auth::require_user(req, state).await?;
    render_page(req, state, &user, &FormErrors::default()).await
}

async fn submit(req: &HttpRequest, state: &AppState, body: &[u8]) -> anyhow::Result<HttpResponse> {
    let user = auth::require_user(req, state).await?;
    let form_data = FormData::parse(body);
    let request = match forms::clean_batch(&form_data) {
        Ok(request) => request,
        Err(errors) => return render_page(req, state, &user, &errors).await,
    };
    let outcome = batch::apply(state.db(), user.id, &request).await?;
    let message = match outcome {
        BatchOutcome::Rejected => Message::error(outcome.message()),
        BatchOutcome::Updated(_) | BatchOutcome::Deleted(_) => Message::success(outcome.message()),
    };
    redirect_with(&batch_url(&state.config().milestones.slug), &[message])
}

/// Render the batch page for `user`.
async fn render_page(
    req: &HttpRequest,
    state: &AppState,
    user: &User,
    errors: &FormErrors,
) -> anyhow::Result<HttpResponse> {
    let listings = milestone::Manager::find_open_by_owner(state.db(), user.id).await?;
    let slug = &state.config().milestones.slug;
    let page = BatchPage {
        action: batch_url(slug),
        slug: slug.clone(),
        milestones: MilestoneRow::all(&listings, milestones::today()),
        actions: BatchPage::action_choices(),
        errors: ErrorView::from(errors),
        messages: flash::read(req),
    };
    let body = state.renderer().batch_page(&page)?;
    Ok(html_page(&page.messages, body))
}
