//! One milestone per day over a date range.
use chrono::Days;
use chrono::NaiveDate;

use crate::db::models::milestone::NewMilestone;

/// Copies of `original` for every day after its date up to and including `end_date`.
///
/// Copies keep the article, revision, owner, title and status of the original
/// but carry no time of day. The original itself is not part of the result.
#[must_use]
pub fn copies(original: &NewMilestone, end_date: NaiveDate) -> Vec<NewMilestone> {
    let span = (end_date - original.date).num_days().unsigned_abs();
    (1..=span)
        .map_while(|offset| original.date.checked_add_days(Days::new(offset)))
        .map(|date| NewMilestone {
            date,
            time: None,
            ..original.clone()
        })
        .collect()
}
