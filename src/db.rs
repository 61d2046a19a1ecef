use std::future::Future;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{error, info, warn};

use crate::config::DbConfig;
use crate::error::{StoreError, StoreResult};
use crate::notices::repo_types::{Notice, NoticeInput};
use crate::users::repo_types::User;
use crate::{notices, users};

#[cfg(test)]
pub mod memory;

/// Everything the handlers need from persistence. One method per statement.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ensure_schema(&self) -> StoreResult<()>;

    async fn list_notices(&self) -> StoreResult<Vec<Notice>>;
    async fn get_notice(&self, id: i64) -> StoreResult<Option<Notice>>;
    async fn create_notice(&self, input: &NoticeInput) -> StoreResult<i64>;
    /// `Ok(false)` when no row has this id.
    async fn update_notice(&self, id: i64, input: &NoticeInput) -> StoreResult<bool>;
    async fn delete_notice(&self, id: i64) -> StoreResult<bool>;
    async fn increment_interest(&self, id: i64) -> StoreResult<bool>;

    async fn insert_user(&self, username: &str, email: &str, password_hash: &str)
        -> StoreResult<i64>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Tables created at startup, in order.
const SCHEMA: [(&str, &str); 2] = [
    ("users", users::repo::CREATE_TABLE),
    ("notices", notices::repo::CREATE_TABLE),
];

/// Runs every statement even if an earlier one fails; reports the first failure.
async fn create_tables<F, Fut>(
    schema: &[(&'static str, &'static str)],
    mut run: F,
) -> StoreResult<()>
where
    F: FnMut(&'static str) -> Fut,
    Fut: Future<Output = StoreResult<()>>,
{
    let mut first_err = None;
    for &(table, ddl) in schema {
        match run(ddl).await {
            Ok(()) => info!(table, "table checked/created"),
            Err(e) => {
                error!(error = %e, table, "table creation failed");
                first_err.get_or_insert(e);
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Builds the bounded pool. Nothing connects until the first query.
pub fn connect(cfg: &DbConfig) -> anyhow::Result<PgPool> {
    let opts = cfg.connect_options()?;
    Ok(PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_lazy_with(opts))
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        let db = &self.db;
        let created = create_tables(&SCHEMA, |ddl| async move {
            sqlx::query(ddl).execute(db).await.map(|_| ()).map_err(StoreError::from)
        })
        .await;

        match sqlx::query("SELECT 1 FROM notices LIMIT 1").execute(db).await {
            Ok(_) => info!("database connection verified"),
            Err(e) => warn!(error = %e, "notices check query failed"),
        }
        created
    }

    async fn list_notices(&self) -> StoreResult<Vec<Notice>> {
        notices::repo::list(&self.db).await
    }

    async fn get_notice(&self, id: i64) -> StoreResult<Option<Notice>> {
        notices::repo::find(&self.db, id).await
    }

    async fn create_notice(&self, input: &NoticeInput) -> StoreResult<i64> {
        notices::repo::insert(&self.db, input).await
    }

    async fn update_notice(&self, id: i64, input: &NoticeInput) -> StoreResult<bool> {
        notices::repo::update(&self.db, id, input).await
    }

    async fn delete_notice(&self, id: i64) -> StoreResult<bool> {
        notices::repo::delete(&self.db, id).await
    }

    async fn increment_interest(&self, id: i64) -> StoreResult<bool> {
        notices::repo::increment_interest(&self.db, id).await
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<i64> {
        users::repo::insert(&self.db, username, email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        users::repo::find_by_email(&self.db, email).await
    }
}
