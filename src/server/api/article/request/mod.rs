use serde::Deserialize;
/// Path of the article milestones tab.
#[derive(Deserialize, Debug)]
pub struct ArticlePath {
    /// Article id.
    pub article_id: i64,
}

/// Path of a milestone's edit form.
#[derive(Deserialize, Debug)]
pub struct MilestonePath {
    /// Article id.
    pub article_id: i64,
    /// Milestone id.
    pub pk: i64,
}
