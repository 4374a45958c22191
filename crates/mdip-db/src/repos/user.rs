//! User repository. Usernames are unique; the check runs before the insert
//! and the UNIQUE constraint backs it up.

use mdip_core::entities::{NewUser, User};
use mdip_core::enums::{EntityKind, UserRole};
use tracing::debug;

use super::{Conditions, Repository};
use crate::{Store, StoreConn};
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_label};
use crate::retry::is_unique_violation;
use crate::updates::user::UserPatch;

const SELECT_COLS: &str = "id, username, password_hash, role, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    let user = User::new(NewUser {
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: parse_label("role", &row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })?;
    Ok(user.with_id(row.get(0)?)?)
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub limit: Option<u32>,
}

pub struct UserRepo<'a> {
    store: &'a Store,
}

impl<'a> UserRepo<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Look up an account by exact username.
    ///
    /// # Errors
    ///
    /// Store failures only; a missing user is `Ok(None)`.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let conn = self.store.connection()?;
        Self::find_in(&conn, username).await
    }

    async fn find_in(conn: &StoreConn<'_>, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = conn
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM users WHERE username = ?1"),
                vec![username.into()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

impl Repository for UserRepo<'_> {
    type Entity = User;
    type Patch = UserPatch;
    type Filter = UserFilter;

    const KIND: EntityKind = EntityKind::User;

    fn store(&self) -> &Store {
        self.store
    }

    async fn create_in(&self, conn: &StoreConn<'_>, user: &User) -> Result<i64, DatabaseError> {
        if let Some(id) = user.id() {
            return Err(DatabaseError::AlreadyPersisted {
                entity: Self::KIND,
                id,
            });
        }
        let conflict = || DatabaseError::Conflict {
            field: "username",
            value: user.username().to_string(),
        };
        if Self::find_in(conn, user.username()).await?.is_some() {
            return Err(conflict());
        }

        let id = conn
            .insert_with(
                "INSERT INTO users (username, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                vec![
                    user.username().into(),
                    user.password_hash().into(),
                    user.role().as_str().into(),
                    user.created_at().to_rfc3339().into(),
                ],
            )
            .await
            .map_err(|e| if is_unique_violation(&e) { conflict() } else { e })?;
        debug!(id, role = %user.role(), "user created");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<User, DatabaseError> {
        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                vec![id.into()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: Self::KIND,
            id,
        })?;
        row_to_user(&row)
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(role) = filter.role {
            conditions.push("role = ?", role.as_str());
        }
        let (tail, params) = conditions.finish(filter.limit);

        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(&format!("SELECT {SELECT_COLS} FROM users {tail}"), params)
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, DatabaseError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = User::new(patch.apply(current.to_new()))?;

        let conn = self.store.connection()?;
        conn.execute_with(
            "UPDATE users SET password_hash = ?1, role = ?2 WHERE id = ?3",
            vec![
                merged.password_hash().into(),
                merged.role().as_str().into(),
                id.into(),
            ],
        )
        .await?;
        debug!(id, "user updated");
        Ok(merged.with_id(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_store, user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let (_dir, store) = test_store().await;
        let repo = UserRepo::new(&store);
        repo.create(&user("alice")).await.unwrap();

        let err = repo.create(&user("alice")).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Conflict { field: "username", ref value } if value == "alice"
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_by_username_is_exact() {
        let (_dir, store) = test_store().await;
        let repo = UserRepo::new(&store);
        let id = repo.create(&user("alice")).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id(), Some(id));
        assert_eq!(found, user("alice").with_id(id).unwrap());
        assert!(repo.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn promote_to_admin() {
        let (_dir, store) = test_store().await;
        let repo = UserRepo::new(&store);
        let id = repo.create(&user("bob")).await.unwrap();

        let patch = UserPatch {
            role: Some(UserRole::Admin),
            ..UserPatch::default()
        };
        let updated = repo.update(id, patch).await.unwrap();
        assert!(updated.is_admin());

        let admins = repo
            .list(&UserFilter {
                role: Some(UserRole::Admin),
                ..UserFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
    }
}
