//! Handlers for the shared milestone calendar.
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate};

use crate::{
    db::models::{milestone, user},
    milestones::{
        colors::ColorMap,
        errors::MilestoneError,
        render::{CalendarPage, CalendarUser},
    },
    server::errors::error_response,
};

use super::auth;
use super::state::{App as AppState, Global as _};

/// Module that maps the HTTP web request query to structs.
pub mod request;

/// Module that maps the calendar events to JSON.
pub mod response;

/// Calendar page with the colour legend.
#[tracing::instrument(skip(req, data))]
pub async fn page(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<request::CalendarQuery>,
) -> impl Responder {
    show_page(&req, &data, query.apk.as_deref())
        .await
        .unwrap_or_else(|err| error_response(&err))
}

/// Calendar events between two instants, as JSON.
#[tracing::instrument(skip(req, data))]
pub async fn events(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<request::EventsQuery>,
) -> impl Responder {
    list_events(&req, &data, &query)
        .await
        .unwrap_or_else(|err| error_response(&err))
}

async fn show_page(
    req: &HttpRequest,
    state: &AppState,
    apk: Option<&str>,
) -> anyhow::Result<HttpResponse> {
    auth::optional_user(req, state).await?;
    let article_pk = parse_article_pk(apk)?;
    let colored = user::Manager::find_all_active_non_staff(state.db()).await?;
    let colors = ColorMap::assign(colored.iter().map(|user| user.id));
    let page = CalendarPage {
        users: colored
            .iter()
            .map(|user| CalendarUser {
                id: user.id,
                name: user.display_name(),
                color: colors.color_for(user.id),
            })
            .collect(),
        article_pk,
        events_url: format!("/{}/calendar/json/", state.config().milestones.slug),
    };
    let body = state.renderer().calendar_page(&page)?;
    Ok(super::utils::html_page(&[], body))
}

async fn list_events(
    req: &HttpRequest,
    state: &AppState,
    query: &request::EventsQuery,
) -> anyhow::Result<HttpResponse> {
    auth::optional_user(req, state).await?;
    let start = epoch_date(query.start.unwrap_or_default())?;
    let end = epoch_date(query.end.unwrap_or_default())?;
    let article_pk = parse_article_pk(query.apk.as_deref())?;
    let colored = user::Manager::find_all_active_non_staff(state.db()).await?;
    let colors = ColorMap::assign(colored.iter().map(|user| user.id));
    let listings = milestone::Manager::find_for_calendar(state.db(), start, end, article_pk).await?;
    let events: Vec<response::CalendarEvent> = listings
        .iter()
        .map(|listing| response::CalendarEvent::new(listing, &colors))
        .collect();
    tracing::debug!(count = events.len(), %start, %end, "Calendar events");
    Ok(HttpResponse::Ok().json(events))
}

/// Optional `apk` article filter. Blank values mean no filter.
fn parse_article_pk(apk: Option<&str>) -> Result<Option<i64>, MilestoneError> {
    match apk.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| MilestoneError::Validation(format!("apk '{raw}' is not an article id"))),
    }
}

/// UTC date of an instant given in seconds since the epoch. Fractions of a second are dropped.
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    reason = "Out of range values are rejected before the cast"
)]
fn epoch_date(seconds: f64) -> Result<NaiveDate, MilestoneError> {
    let invalid = || MilestoneError::Validation(format!("{seconds} is not a valid timestamp"));
    if !seconds.is_finite() || seconds.abs() >= 1e15 {
        return Err(invalid());
    }
    DateTime::from_timestamp(seconds.floor() as i64, 0)
        .map(|instant| instant.date_naive())
        .ok_or_else(invalid)
}
