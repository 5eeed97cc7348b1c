use serde::Serialize;

use crate::db::models::milestone::{Listing, DATE_FORMAT};
use crate::milestones::colors::ColorMap;

/// One milestone in the calendar events feed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Milestone id.
    pub id: i64,
    /// Milestone title.
    pub title: String,
    /// `YYYY-MM-DD`, or `YYYY-MM-DDTHH:MM:SS` for timed milestones.
    pub start: String,
    /// Whether the milestone has no time.
    pub all_day: bool,
    /// Colour of the owner.
    pub color: &'static str,
    /// Status code.
    pub status: i64,
    /// Status name.
    pub status_label: &'static str,
    /// Owner display name.
    pub owner: String,
    /// Title of the owning article.
    pub article: String,
}

impl CalendarEvent {
    /// Event for a listed milestone, coloured after its owner.
    #[must_use]
    pub fn new(listing: &Listing, colors: &ColorMap) -> Self {
        let milestone = &listing.milestone;
        let date = milestone.date.format(DATE_FORMAT);
        let start = milestone.time.map_or_else(
            || date.to_string(),
            |time| format!("{date}T{}", time.format("%H:%M:%S")),
        );
        Self {
            id: milestone.id,
            title: milestone.title.clone(),
            start,
            all_day: milestone.time.is_none(),
            color: colors.color_for(milestone.owner_id),
            status: milestone.status.to_int(),
            status_label: milestone.status.label(),
            owner: listing.owner_name.clone(),
            article: listing.article_title.clone(),
        }
    }
}
