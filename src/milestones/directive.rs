//! The `[milestones ...]` directive.
//!
//! A line of article text may carry a directive such as
//! `[milestones owner:ada days:14]`. Expansion replaces the directive with the
//! rendered list of matching milestones and leaves the rest of the line alone.
//!
//! Qualifiers accumulate over the directives of one document: a later
//! directive only overrides the constraints it sets itself.
use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::db::models::milestone::{self, ListingFilter};
use crate::db::DatabaseConnection;

use super::forms::parse_date;
use super::render::{MilestoneRow, Renderer};

#[allow(clippy::expect_used)]
/// Matches a directive. Qualifiers are optional but must appear in this order.
fn directive_re() -> &'static Regex {
    lazy_static! {
        static ref RE: Regex = Regex::new(
            r"(?i)\[milestones(\s+owner:(?P<owner>\w+))?(\s+days:(?P<days>\d+))?(\s+start_date:(?P<start_date>[-\w]+))?(\s+end_date:(?P<end_date>[-\w]+))?\s*\]",
        )
        .expect("Failed to compile regex!?!");
    }
    &RE
}

/// A directive found in a line, qualifiers still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'line> {
    /// The directive text, brackets included.
    pub text: &'line str,
    /// `owner:` qualifier.
    pub owner: Option<&'line str>,
    /// `days:` qualifier.
    pub days: Option<&'line str>,
    /// `start_date:` qualifier.
    pub start_date: Option<&'line str>,
    /// `end_date:` qualifier.
    pub end_date: Option<&'line str>,
}

impl<'line> Directive<'line> {
    /// Find the directive in `line`. When a line holds several, the last one wins.
    #[must_use]
    pub fn find(line: &'line str) -> Option<Self> {
        let captures = directive_re().captures_iter(line).last()?;
        let group = |name: &str| captures.name(name).map(|found| found.as_str());
        Some(Self {
            text: captures.get(0)?.as_str(),
            owner: group("owner"),
            days: group("days"),
            start_date: group("start_date"),
            end_date: group("end_date"),
        })
    }
}

/// Listing constraints accumulated over the directives of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingScope {
    /// Constraints handed to the query.
    filter: ListingFilter,
    /// Look-ahead used when a directive has neither `start_date` nor `end_date`.
    days: u64,
}

impl ListingScope {
    /// A scope with no constraints yet.
    #[must_use]
    pub fn new(default_days: u32) -> Self {
        Self {
            filter: ListingFilter::default(),
            days: u64::from(default_days),
        }
    }

    /// Fold a directive into the scope and return the filter it yields.
    ///
    /// Nothing changes when a qualifier is invalid.
    ///
    /// # Errors
    /// Errors if a date qualifier is not a date or the look-ahead overflows the calendar.
    pub fn apply(
        &mut self,
        directive: &Directive<'_>,
        today: NaiveDate,
    ) -> anyhow::Result<ListingFilter> {
        let start_date = directive.start_date.map(parse_qualifier).transpose()?;
        let end_date = directive.end_date.map(parse_qualifier).transpose()?;
        let days = directive
            .days
            .map(str::parse::<u64>)
            .transpose()?
            .unwrap_or(self.days);

        let mut filter = self.filter.clone();
        if let Some(owner) = directive.owner {
            filter.owner = Some(owner.trim().to_owned());
        }
        if start_date.is_some() {
            filter.date_from = start_date;
        }
        if end_date.is_some() {
            filter.date_to = end_date;
        }
        if start_date.is_none() && end_date.is_none() {
            let horizon = today
                .checked_add_days(Days::new(days))
                .ok_or_else(|| anyhow::anyhow!("days:{days} is too far in the future"))?;
            filter.date_to = Some(horizon);
            self.days = days;
        }
        self.filter = filter.clone();
        Ok(filter)
    }
}

/// Parse a date qualifier.
fn parse_qualifier(raw: &str) -> anyhow::Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| anyhow::anyhow!("'{raw}' is not a valid date"))
}

/// Replace every directive in `text` with the list of milestones it selects.
///
/// Lines are separated by `\n` and kept in place. A directive with an invalid
/// qualifier is replaced by an error fragment instead of failing the document.
///
/// # Errors
/// Errors if the database cannot be queried or a fragment fails to render.
#[tracing::instrument(level = "debug", skip(db, renderer, text))]
pub async fn expand(
    db: &DatabaseConnection,
    renderer: &Renderer,
    text: &str,
    today: NaiveDate,
    default_days: u32,
) -> anyhow::Result<String> {
    let mut scope = ListingScope::new(default_days);
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let Some(directive) = Directive::find(line) else {
            lines.push(line.to_owned());
            continue;
        };
        let fragment = match scope.apply(&directive, today) {
            Ok(filter) => {
                let listings = milestone::Manager::find_listed(db, &filter, today).await?;
                tracing::debug!(count = listings.len(), "Expanding milestones directive");
                renderer.milestone_list(&MilestoneRow::all(&listings, today))?
            }
            Err(err) => {
                tracing::warn!("Invalid milestones directive '{}': {err}", directive.text);
                renderer.directive_error(&format!(
                    "Invalid milestones directive {}: {err}",
                    directive.text
                ))?
            }
        };
        lines.push(line.replace(directive.text, &fragment));
    }
    Ok(lines.join("\n"))
}
