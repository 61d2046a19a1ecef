use tracing::{debug, warn};

use crate::db::Store;
use crate::error::{StoreError, StoreResult};
use crate::users::password::{hash_password, verify_password};
use crate::users::repo_types::{NewUser, User};

/// Hashes the password and inserts the user. Duplicate emails fail with
/// `StoreError::UniqueViolation`. `user.email` must already be normalized.
pub async fn create_user(store: &dyn Store, user: &NewUser) -> StoreResult<i64> {
    let hash = hash_password(&user.password).map_err(|e| StoreError::Hash(e.to_string()))?;
    store.insert_user(&user.username, &user.email, &hash).await
}

/// The user whose email matches exactly and whose stored hash accepts `password`.
pub async fn find_user_by_credentials(
    store: &dyn Store,
    email: &str,
    password: &str,
) -> StoreResult<Option<User>> {
    let Some(user) = store.find_user_by_email(email).await? else {
        debug!("no user for email");
        return Ok(None);
    };
    match verify_password(password, &user.password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => {
            warn!(error = %e, user_id = user.id, "stored password is not a valid hash");
            Ok(None)
        }
    }
}
