use sqlx::PgPool;

use crate::error::StoreResult;
use crate::users::repo_types::User;

pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
"#;

/// Find a user by (already normalized) email.
pub async fn find_by_email(db: &PgPool, email: &str) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Insert a user row. A taken email surfaces as `StoreError::UniqueViolation`.
pub async fn insert(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> StoreResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, email, password)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{test_pool, unique_email};
    use crate::error::StoreError;

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn duplicate_email_is_unique_violation() {
        let db = test_pool().await;
        let email = unique_email();
        let id = insert(&db, "alice", &email, "hash").await.expect("insert");

        let err = insert(&db, "alice again", &email, "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        let found = find_by_email(&db, &email).await.expect("find").expect("present");
        assert_eq!(found.id, id);
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn unknown_email_is_none() {
        let db = test_pool().await;
        let found = find_by_email(&db, &unique_email()).await.expect("find");
        assert!(found.is_none());
    }
}
