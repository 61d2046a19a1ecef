use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Value written to `roles` for every new notice. Never read back.
pub const DEFAULT_ROLE: &str = "admin";

/// Notice record in the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Notice {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub event_date: Option<Date>,
    pub venue: Option<String>,
    pub roles: Option<String>,
    pub interested_count: i32,
    pub created_at: OffsetDateTime,
}

/// The five editable fields, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub event_date: Option<Date>,
    pub venue: Option<String>,
}
