use serde::Deserialize;
use time::{macros::format_description, Date};

use crate::notices::repo_types::NoticeInput;

/// Body of the new/edit notice forms. Text fields pass through untouched.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
    pub event_date: Option<String>,
    pub venue: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidDate(pub String);

/// `YYYY-MM-DD` as sent by `<input type="date">`. Blank means no date.
pub fn parse_event_date(raw: Option<&str>) -> Result<Option<Date>, InvalidDate> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Some)
            .map_err(|_| InvalidDate(s.to_string())),
    }
}

impl TryFrom<NoticeForm> for NoticeInput {
    type Error = InvalidDate;

    fn try_from(form: NoticeForm) -> Result<Self, Self::Error> {
        let event_date = parse_event_date(form.event_date.as_deref())?;
        Ok(NoticeInput {
            title: form.title,
            content: form.content,
            category: form.category,
            event_date,
            venue: form.venue,
        })
    }
}
