//! HTML rendering of milestone lists and pages.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::db::models::article::Article;
use crate::db::models::milestone::{Listing, Milestone, DATE_FORMAT};
use crate::db::models::status::Status;
use crate::db::models::user::User;
use crate::utils::form::FormData;

use super::forms::{BatchAction, FormErrors};

/// Milestone list fragment, used by the directive and the article page.
const LIST_TEMPLATE: &str = "milestones/list.html";
/// Error shown in place of a directive that could not be expanded.
const ERROR_TEMPLATE: &str = "milestones/error.html";
/// Flash messages.
const MESSAGES_TEMPLATE: &str = "milestones/messages.html";
/// Article milestones tab.
const ARTICLE_TEMPLATE: &str = "milestones/article.html";
/// Batch editor.
const BATCH_TEMPLATE: &str = "milestones/batch.html";
/// Calendar page.
const CALENDAR_TEMPLATE: &str = "milestones/calendar.html";

/// Templates compiled once at start-up.
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Compiled templates.
    tera: Tera,
}

impl Renderer {
    /// Compile the embedded templates.
    ///
    /// # Errors
    /// Errors if a template does not parse.
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (LIST_TEMPLATE, include_str!("../../templates/milestones/list.html")),
            (ERROR_TEMPLATE, include_str!("../../templates/milestones/error.html")),
            (MESSAGES_TEMPLATE, include_str!("../../templates/milestones/messages.html")),
            (ARTICLE_TEMPLATE, include_str!("../../templates/milestones/article.html")),
            (BATCH_TEMPLATE, include_str!("../../templates/milestones/batch.html")),
            (CALENDAR_TEMPLATE, include_str!("../../templates/milestones/calendar.html")),
        ])?;
        Ok(Self { tera })
    }

    /// Render `template` with a serializable context.
    fn render<T: Serialize>(&self, template: &str, context: &T) -> anyhow::Result<String> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &context)?)
    }

    /// The list fragment substituted for a `[milestones]` directive.
    ///
    /// # Errors
    /// Errors if the template fails to render.
    pub fn milestone_list(&self, milestones: &[MilestoneRow]) -> anyhow::Result<String> {
        self.render(
            LIST_TEMPLATE,
            &ListFragment {
                milestones,
                show_article_title: true,
                show_edit_links: false,
                slug: "",
            },
        )
    }

    /// Error fragment substituted for a directive that could not be expanded.
    ///
    /// # Errors
    /// Errors if the template fails to render.
    pub fn directive_error(&self, message: &str) -> anyhow::Result<String> {
        #[derive(Serialize)]
        struct ErrorFragment<'msg> {
            message: &'msg str,
        }
        self.render(ERROR_TEMPLATE, &ErrorFragment { message })
    }

    /// The article milestones tab.
    ///
    /// # Errors
    /// Errors if the template fails to render.
    pub fn article_page(&self, page: &ArticlePage) -> anyhow::Result<String> {
        self.render(ARTICLE_TEMPLATE, page)
    }

    /// The batch editor.
    ///
    /// # Errors
    /// Errors if the template fails to render.
    pub fn batch_page(&self, page: &BatchPage) -> anyhow::Result<String> {
        self.render(BATCH_TEMPLATE, page)
    }

    /// The calendar page.
    ///
    /// # Errors
    /// Errors if the template fails to render.
    pub fn calendar_page(&self, page: &CalendarPage) -> anyhow::Result<String> {
        self.render(CALENDAR_TEMPLATE, page)
    }
}

/// Context of the list fragment.
#[derive(Serialize)]
struct ListFragment<'rows> {
    milestones: &'rows [MilestoneRow],
    show_article_title: bool,
    show_edit_links: bool,
    slug: &'rows str,
}

/// One milestone as displayed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRow {
    /// Milestone id.
    pub id: i64,
    /// Owning article.
    pub article_id: i64,
    /// Title of the owning article.
    pub article_title: String,
    /// Milestone title.
    pub title: String,
    /// Status code.
    pub status: Status,
    /// Status name.
    pub status_label: &'static str,
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Time as `HH:MM`, empty for all-day milestones.
    pub time: String,
    /// Owner display name.
    pub owner_name: String,
    /// `danger` when overdue, otherwise empty.
    pub overdue_class: &'static str,
    /// Extra row classes.
    pub status_class: String,
}

impl MilestoneRow {
    /// Prepare a listing for display as of `today`.
    #[must_use]
    pub fn new(listing: &Listing, today: NaiveDate) -> Self {
        let milestone = &listing.milestone;
        Self {
            id: milestone.id,
            article_id: milestone.article_id,
            article_title: listing.article_title.clone(),
            title: milestone.title.clone(),
            status: milestone.status,
            status_label: milestone.status.label(),
            date: milestone.date.format(DATE_FORMAT).to_string(),
            time: milestone
                .time
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_default(),
            owner_name: listing.owner_name.clone(),
            overdue_class: milestone.overdue_class(today).unwrap_or_default(),
            status_class: milestone.status_class(today),
        }
    }

    /// Prepare many listings for display.
    #[must_use]
    pub fn all(listings: &[Listing], today: NaiveDate) -> Vec<Self> {
        listings
            .iter()
            .map(|listing| Self::new(listing, today))
            .collect()
    }
}

/// A one-shot message shown on the next rendered page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// `success` or `error`.
    pub level: String,
    /// Text shown to the user.
    pub text: String,
}

impl Message {
    /// A success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: "success".to_owned(),
            text: text.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: "error".to_owned(),
            text: text.into(),
        }
    }
}

/// An option of a select input.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Submitted value.
    pub value: String,
    /// Shown label.
    pub label: String,
    /// Whether the option is preselected.
    pub selected: bool,
}

/// Validation messages laid out per known field, so templates never look up missing keys.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorView {
    /// Owner field messages.
    pub owner: Vec<String>,
    /// Title field messages.
    pub title: Vec<String>,
    /// Status field messages.
    pub status: Vec<String>,
    /// Date field messages.
    pub date: Vec<String>,
    /// Time field messages.
    pub time: Vec<String>,
    /// End date field messages.
    pub end_date: Vec<String>,
    /// Batch action messages.
    pub action: Vec<String>,
    /// Batch selection messages.
    pub selected: Vec<String>,
    /// Form-wide messages.
    pub non_field: Vec<String>,
}

impl From<&FormErrors> for ErrorView {
    fn from(errors: &FormErrors) -> Self {
        let field = |name: &str| errors.fields.get(name).cloned().unwrap_or_default();
        Self {
            owner: field("owner"),
            title: field("title"),
            status: field("status"),
            date: field("date"),
            time: field("time"),
            end_date: field("end_date"),
            action: field("action"),
            selected: field("_selected_action"),
            non_field: errors.non_field.clone(),
        }
    }
}

/// Values and errors of the create or edit form.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MilestoneFormView {
    /// URL the form posts to.
    pub action: String,
    /// Id of the milestone being edited, unset on the create form.
    pub editing: Option<i64>,
    /// Owner choices.
    pub owners: Vec<Choice>,
    /// Status choices.
    pub statuses: Vec<Choice>,
    /// Title value.
    pub title: String,
    /// Date value.
    pub date: String,
    /// Time value.
    pub time: String,
    /// End date value.
    pub end_date: String,
    /// Deleted checkbox state.
    pub deleted: bool,
    /// Validation messages.
    pub errors: ErrorView,
}

/// Current values of the milestone form fields as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    /// Selected owner id.
    pub owner: String,
    /// Title.
    pub title: String,
    /// Selected status code.
    pub status: String,
    /// Date.
    pub date: String,
    /// Time.
    pub time: String,
    /// End date.
    pub end_date: String,
    /// Deleted flag.
    pub deleted: bool,
}

impl FormValues {
    /// Blank create form preselecting `owner` and the default status.
    #[must_use]
    pub fn initial(owner: Option<&User>) -> Self {
        Self {
            owner: owner.map(|user| user.id.to_string()).unwrap_or_default(),
            status: Status::default().to_int().to_string(),
            ..Self::default()
        }
    }

    /// Values of a stored milestone, for the edit form.
    #[must_use]
    pub fn of(milestone: &Milestone) -> Self {
        Self {
            owner: milestone.owner_id.to_string(),
            title: milestone.title.clone(),
            status: milestone.status.to_int().to_string(),
            date: milestone.date.format(DATE_FORMAT).to_string(),
            time: milestone
                .time
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_default(),
            end_date: String::new(),
            deleted: milestone.deleted,
        }
    }

    /// Values as submitted, so a rejected form shows what was typed.
    #[must_use]
    pub fn submitted(data: &FormData) -> Self {
        let value = |key: &str| data.get(key).unwrap_or_default().to_owned();
        Self {
            owner: value("owner"),
            title: value("title"),
            status: value("status"),
            date: value("date"),
            time: value("time"),
            end_date: value("end_date"),
            deleted: data.is_checked("deleted"),
        }
    }
}

impl MilestoneFormView {
    /// Build the form from its values.
    #[must_use]
    pub fn new(
        action: String,
        editing: Option<i64>,
        owners: &[User],
        values: FormValues,
        errors: &FormErrors,
    ) -> Self {
        let owners = owners
            .iter()
            .map(|owner| {
                let value = owner.id.to_string();
                Choice {
                    selected: value == values.owner,
                    value,
                    label: owner.display_name(),
                }
            })
            .collect();
        let statuses = Status::ALL
            .iter()
            .map(|status| {
                let value = status.to_int().to_string();
                Choice {
                    selected: value == values.status,
                    value,
                    label: status.label().to_owned(),
                }
            })
            .collect();
        Self {
            action,
            editing,
            owners,
            statuses,
            title: values.title,
            date: values.date,
            time: values.time,
            end_date: values.end_date,
            deleted: values.deleted,
            errors: ErrorView::from(errors),
        }
    }
}

/// Context of the article milestones tab.
#[derive(Serialize, Debug, Clone)]
pub struct ArticlePage {
    /// The article.
    pub article: Article,
    /// Plugin slug for building links.
    pub slug: String,
    /// Every milestone of the article.
    pub milestones: Vec<MilestoneRow>,
    /// Always false on this page.
    pub show_article_title: bool,
    /// Always true on this page.
    pub show_edit_links: bool,
    /// Flash messages.
    pub messages: Vec<Message>,
    /// Hide the form from anonymous users when anonymous writes are off.
    pub anonymous_disallowed: bool,
    /// Create or edit form.
    pub form: MilestoneFormView,
}

/// Context of the batch editor.
#[derive(Serialize, Debug, Clone)]
pub struct BatchPage {
    /// URL the form posts to.
    pub action: String,
    /// Plugin slug for building links.
    pub slug: String,
    /// Open milestones of the requester.
    pub milestones: Vec<MilestoneRow>,
    /// Available actions.
    pub actions: Vec<Choice>,
    /// Validation messages.
    pub errors: ErrorView,
    /// Flash messages.
    pub messages: Vec<Message>,
}

impl BatchPage {
    /// Action choices in display order.
    #[must_use]
    pub fn action_choices() -> Vec<Choice> {
        BatchAction::ALL
            .iter()
            .map(|action| Choice {
                value: action.value(),
                label: action.label(),
                selected: false,
            })
            .collect()
    }
}

/// A calendar legend entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CalendarUser {
    /// User id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Assigned colour.
    pub color: &'static str,
}

/// Context of the calendar page.
#[derive(Serialize, Debug, Clone)]
pub struct CalendarPage {
    /// Users with their colours.
    pub users: Vec<CalendarUser>,
    /// Optional article filter passed through to the events feed.
    pub article_pk: Option<i64>,
    /// URL of the JSON events feed.
    pub events_url: String,
}
