//! Registration and login against the user table.

use chrono::Utc;
use mdip_core::entities::{NewUser, User, validate_username};
use mdip_core::enums::UserRole;
use mdip_db::Store;
use mdip_db::repos::{Repository, UserRepo};
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::password::{hash_password, validate_password_strength, verify_password};

/// Create an account with a freshly hashed password.
///
/// # Errors
///
/// `Validation` for a malformed username, `WeakPassword` below `min_length`,
/// `Database(Conflict)` when the username is taken.
pub async fn register(
    store: &Store,
    username: &str,
    password: &str,
    role: UserRole,
    min_length: usize,
) -> Result<User, AuthError> {
    validate_username(username)?;
    validate_password_strength(password, min_length)?;

    let user = User::new(NewUser {
        username: username.to_string(),
        password_hash: hash_password(password)?,
        role,
        created_at: Utc::now(),
    })?;
    let repo = UserRepo::new(store);
    let id = repo.create(&user).await?;
    info!(id, username, %role, "account registered");
    Ok(repo.get(id).await?)
}

/// Check a username/password pair.
///
/// # Errors
///
/// `InvalidCredentials` for an unknown user or a wrong password. A stored
/// hash that cannot be parsed also ends as `InvalidCredentials`.
pub async fn login(store: &Store, username: &str, password: &str) -> Result<User, AuthError> {
    let Some(user) = UserRepo::new(store).find_by_username(username).await? else {
        debug!(username, "login: unknown user");
        return Err(AuthError::InvalidCredentials);
    };
    match verify_password(password, user.password_hash()) {
        Ok(true) => {
            info!(username, "login succeeded");
            Ok(user)
        }
        Ok(false) => {
            debug!(username, "login: password mismatch");
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => {
            warn!(username, error = %e, "stored hash is unusable");
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdip_db::error::DatabaseError;
    use pretty_assertions::assert_eq;

    async fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.db");
        let store = Store::open_local(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn register_then_login() {
        let (_dir, store) = store().await;
        let user = register(&store, "analyst_1", "s3cret-pass", UserRole::User, 6)
            .await
            .unwrap();
        assert!(user.id().is_some());
        assert!(user.password_hash().starts_with("$argon2id$"));

        let logged_in = login(&store, "analyst_1", "s3cret-pass").await.unwrap();
        assert_eq!(logged_in.id(), user.id());
        assert_eq!(logged_in.role(), UserRole::User);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (_dir, store) = store().await;
        register(&store, "admin", "hunter22", UserRole::Admin, 6)
            .await
            .unwrap();

        let wrong = login(&store, "admin", "hunter23").await.unwrap_err();
        let unknown = login(&store, "nobody", "hunter22").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (_dir, store) = store().await;
        register(&store, "dup_user", "password1", UserRole::User, 6)
            .await
            .unwrap();
        let err = register(&store, "dup_user", "password2", UserRole::User, 6)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Database(DatabaseError::Conflict { field: "username", .. })
        ));
    }

    #[tokio::test]
    async fn short_password_and_bad_username_are_rejected() {
        let (_dir, store) = store().await;
        assert!(matches!(
            register(&store, "valid_name", "abc", UserRole::User, 6).await,
            Err(AuthError::WeakPassword { min_length: 6 })
        ));
        assert!(matches!(
            register(&store, "a b", "long-enough", UserRole::User, 6).await,
            Err(AuthError::Validation(_))
        ));
        assert_eq!(UserRepo::new(&store).count().await.unwrap(), 0);
    }
}
