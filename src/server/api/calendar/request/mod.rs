use serde::Deserialize;
/// Query of the calendar page.
#[derive(Deserialize, Debug)]
pub struct CalendarQuery {
    /// Restrict the calendar to one article. Blank means every article.
    pub apk: Option<String>,
}

/// Query of the calendar events feed.
#[derive(Deserialize, Debug)]
pub struct EventsQuery {
    /// Window start in seconds since the epoch.
    pub start: Option<f64>,
    /// Window end in seconds since the epoch.
    pub end: Option<f64>,
    /// Restrict the feed to one article. Blank means every article.
    pub apk: Option<String>,
}
