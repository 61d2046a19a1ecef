use sqlx::PgPool;

use crate::error::StoreResult;
use crate::notices::repo_types::{Notice, NoticeInput, DEFAULT_ROLE};

pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS notices (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT,
        event_date DATE,
        venue TEXT,
        roles TEXT,
        interested_count INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// All notices in insertion order.
pub async fn list(db: &PgPool) -> StoreResult<Vec<Notice>> {
    let rows = sqlx::query_as::<_, Notice>(
        r#"
        SELECT id, title, content, category, event_date, venue, roles,
               interested_count, created_at
          FROM notices
         ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: i64) -> StoreResult<Option<Notice>> {
    let row = sqlx::query_as::<_, Notice>(
        r#"
        SELECT id, title, content, category, event_date, venue, roles,
               interested_count, created_at
          FROM notices
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, input: &NoticeInput) -> StoreResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO notices (title, content, category, event_date, venue, roles)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.category)
    .bind(input.event_date)
    .bind(&input.venue)
    .bind(DEFAULT_ROLE)
    .fetch_one(db)
    .await?;
    Ok(id)
}

/// Overwrites the five editable fields. Returns whether a row matched.
pub async fn update(db: &PgPool, id: i64, input: &NoticeInput) -> StoreResult<bool> {
    let res = sqlx::query(
        r#"
        UPDATE notices
           SET title = $1, content = $2, category = $3, event_date = $4, venue = $5
         WHERE id = $6
        "#,
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.category)
    .bind(input.event_date)
    .bind(&input.venue)
    .bind(id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, id: i64) -> StoreResult<bool> {
    let res = sqlx::query("DELETE FROM notices WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Single-statement increment; the store serializes concurrent bumps.
pub async fn increment_interest(db: &PgPool, id: i64) -> StoreResult<bool> {
    let res = sqlx::query(
        "UPDATE notices SET interested_count = interested_count + 1 WHERE id = $1",
    )
    .bind(id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() > 0)
}
