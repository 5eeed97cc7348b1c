//! Handlers for the milestones tab of an article.
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::{
    db::models::{
        article::{self, Article},
        milestone,
        user::{self, User},
    },
    milestones::{
        self,
        errors::MilestoneError,
        forms::{self, FormErrors, FormKind},
        lifecycle,
        render::{ArticlePage, FormValues, Message, MilestoneFormView, MilestoneRow},
    },
    server::{errors::error_response, flash},
    utils::form::FormData,
};

use super::auth;
use super::state::{App as AppState, Global as _};
use super::utils::{article_tab_url, edit_url, html_page, redirect_with};

/// Module that maps the HTTP web request path to structs.
pub mod request;

/// List the article's milestones with an empty create form.
#[tracing::instrument(skip(req, data))]
pub async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Path<request::ArticlePath>,
) -> impl Responder {
    show_list(&req, &data, params.article_id)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

/// Create a milestone, and its copies when an end date is given.
#[tracing::instrument(skip(req, data, body))]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Path<request::ArticlePath>,
    body: web::Bytes,
) -> impl Responder {
    submit_create(&req, &data, params.article_id, &body)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

/// Show the edit form of one milestone.
#[tracing::instrument(skip(req, data))]
pub async fn edit_form(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Path<request::MilestonePath>,
) -> impl Responder {
    show_edit_form(&req, &data, params.article_id, params.pk)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

/// Save the edit form of one milestone.
#[tracing::instrument(skip(req, data, body))]
pub async fn edit(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Path<request::MilestonePath>,
    body: web::Bytes,
) -> impl Responder {
    submit_edit(&req, &data, params.article_id, params.pk, &body)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

async fn show_list(
    req: &HttpRequest,
    state: &AppState,
    article_id: i64,
) -> anyhow::Result<HttpResponse> {
    let user = auth::optional_user(req, state).await?;
    let article = find_article(state, article_id).await?;
    let form = MilestoneFormView::new(
        article_tab_url(&state.config().milestones.slug, article_id),
        None,
        &owners(state).await?,
        FormValues::initial(user.as_ref()),
        &FormErrors::default(),
    );
    render_page(req, state, article, user.as_ref(), form).await
}

async fn submit_create(
    req: &HttpRequest,
    state: &AppState,
    article_id: i64,
    body: &[u8],
) -> anyhow::Result<HttpResponse> {
    let user = auth::optional_user(req, state).await?;
    let article = find_article(state, article_id).await?;
    let owners = owners(state).await?;
    let form_data = FormData::parse(body);
    let tab_url = article_tab_url(&state.config().milestones.slug, article_id);
    match forms::clean_milestone(&form_data, FormKind::Create, &owners) {
        Ok(input) => {
            let actor = auth::actor(req, user);
            lifecycle::create_milestone(state.db(), article_id, &input, &actor).await?;
            redirect_with(
                &tab_url,
                &[Message::success(format!(
                    "{} was successfully added.",
                    input.title
                ))],
            )
        }
        Err(errors) => {
            tracing::debug!("Rejected milestone form: {errors:?}");
            let form = MilestoneFormView::new(
                tab_url,
                None,
                &owners,
                FormValues::submitted(&form_data),
                &errors,
            );
            render_page(req, state, article, user.as_ref(), form).await
        }
    }
}

async fn show_edit_form(
    req: &HttpRequest,
    state: &AppState,
    article_id: i64,
    milestone_id: i64,
) -> anyhow::Result<HttpResponse> {
    let user = auth::optional_user(req, state).await?;
    let article = find_article(state, article_id).await?;
    let found = milestone::Manager::find_by_id_and_article(state.db(), milestone_id, article_id)
        .await?
        .ok_or(MilestoneError::MilestoneNotFound(milestone_id))?;
    let form = MilestoneFormView::new(
        edit_url(&state.config().milestones.slug, article_id, milestone_id),
        Some(milestone_id),
        &owners(state).await?,
        FormValues::of(&found),
        &FormErrors::default(),
    );
    render_page(req, state, article, user.as_ref(), form).await
}

async fn submit_edit(
    req: &HttpRequest,
    state: &AppState,
    article_id: i64,
    milestone_id: i64,
    body: &[u8],
) -> anyhow::Result<HttpResponse> {
    let user = auth::optional_user(req, state).await?;
    let article = find_article(state, article_id).await?;
    let owners = owners(state).await?;
    let form_data = FormData::parse(body);
    let slug = &state.config().milestones.slug;
    match forms::clean_milestone(&form_data, FormKind::Edit, &owners) {
        Ok(input) => {
            let actor = auth::actor(req, user);
            lifecycle::update_milestone(state.db(), article_id, milestone_id, &input, &actor)
                .await?;
            redirect_with(
                &article_tab_url(slug, article_id),
                &[Message::success(format!(
                    "{} was successfully updated.",
                    input.title
                ))],
            )
        }
        Err(errors) => {
            let form = MilestoneFormView::new(
                edit_url(slug, article_id, milestone_id),
                Some(milestone_id),
                &owners,
                FormValues::submitted(&form_data),
                &errors,
            );
            render_page(req, state, article, user.as_ref(), form).await
        }
    }
}

/// The article, or [`MilestoneError::ArticleNotFound`].
async fn find_article(state: &AppState, article_id: i64) -> anyhow::Result<Article> {
    Ok(article::Manager::find_by_id(state.db(), article_id)
        .await?
        .ok_or(MilestoneError::ArticleNotFound(article_id))?)
}

/// Users a milestone can be assigned to.
async fn owners(state: &AppState) -> anyhow::Result<Vec<User>> {
    user::Manager::find_all_active(state.db()).await
}

/// Render the tab with the article's milestones, pending flash messages and `form`.
async fn render_page(
    req: &HttpRequest,
    state: &AppState,
    article: Article,
    user: Option<&User>,
    form: MilestoneFormView,
) -> anyhow::Result<HttpResponse> {
    let today = milestones::today();
    let listings = milestone::Manager::find_all_by_article(state.db(), article.id).await?;
    let config = &state.config().milestones;
    let page = ArticlePage {
        article,
        slug: config.slug.clone(),
        milestones: MilestoneRow::all(&listings, today),
        show_article_title: false,
        show_edit_links: true,
        messages: flash::read(req),
        anonymous_disallowed: user.is_none() && !config.allow_anonymous,
        form,
    };
    let body = state.renderer().article_page(&page)?;
    Ok(html_page(&page.messages, body))
}
