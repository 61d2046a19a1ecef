use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::db::Store;
use crate::error::{StoreError, StoreResult};
use crate::notices::repo_types::{Notice, NoticeInput, DEFAULT_ROLE};
use crate::users::repo_types::User;

/// In-process `Store` for handler tests. Mirrors the Postgres semantics:
/// sequential ids, unique emails, no-op updates on missing rows.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    notices: Vec<Notice>,
    users: Vec<User>,
    next_notice_id: i64,
    next_user_id: i64,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut guard = self.inner.lock().expect("memory store poisoned");
        f(&mut guard)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_notices(&self) -> StoreResult<Vec<Notice>> {
        Ok(self.with(|t| t.notices.clone()))
    }

    async fn get_notice(&self, id: i64) -> StoreResult<Option<Notice>> {
        Ok(self.with(|t| t.notices.iter().find(|n| n.id == id).cloned()))
    }

    async fn create_notice(&self, input: &NoticeInput) -> StoreResult<i64> {
        Ok(self.with(|t| {
            t.next_notice_id += 1;
            let id = t.next_notice_id;
            t.notices.push(Notice {
                id,
                title: input.title.clone(),
                content: input.content.clone(),
                category: input.category.clone(),
                event_date: input.event_date,
                venue: input.venue.clone(),
                roles: Some(DEFAULT_ROLE.to_string()),
                interested_count: 0,
                created_at: OffsetDateTime::now_utc(),
            });
            id
        }))
    }

    async fn update_notice(&self, id: i64, input: &NoticeInput) -> StoreResult<bool> {
        Ok(self.with(|t| match t.notices.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.title = input.title.clone();
                n.content = input.content.clone();
                n.category = input.category.clone();
                n.event_date = input.event_date;
                n.venue = input.venue.clone();
                true
            }
            None => false,
        }))
    }

    async fn delete_notice(&self, id: i64) -> StoreResult<bool> {
        Ok(self.with(|t| {
            let before = t.notices.len();
            t.notices.retain(|n| n.id != id);
            t.notices.len() != before
        }))
    }

    async fn increment_interest(&self, id: i64) -> StoreResult<bool> {
        Ok(self.with(|t| match t.notices.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.interested_count += 1;
                true
            }
            None => false,
        }))
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> StoreResult<i64> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == email) {
                return Err(StoreError::UniqueViolation);
            }
            t.next_user_id += 1;
            let id = t.next_user_id;
            t.users.push(User {
                id,
                username: username.to_string(),
                email: email.to_string(),
                password: password_hash.to_string(),
            });
            Ok(id)
        })
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }
}

/// Fails every call, for exercising the error paths of handlers.
pub struct BrokenStore;

#[async_trait]
impl Store for BrokenStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn list_notices(&self) -> StoreResult<Vec<Notice>> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn get_notice(&self, _id: i64) -> StoreResult<Option<Notice>> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn create_notice(&self, _input: &NoticeInput) -> StoreResult<i64> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn update_notice(&self, _id: i64, _input: &NoticeInput) -> StoreResult<bool> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn delete_notice(&self, _id: i64) -> StoreResult<bool> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn increment_interest(&self, _id: i64) -> StoreResult<bool> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn insert_user(&self, _u: &str, _e: &str, _p: &str) -> StoreResult<i64> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }

    async fn find_user_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Connectivity(sqlx::Error::PoolTimedOut))
    }
}
