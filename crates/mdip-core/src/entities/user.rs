use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::enums::{EntityKind, UserRole};
use crate::errors::{CoreError, Rule, ValidationError};
use crate::validate;

const MIN_USERNAME_LENGTH: usize = 3;

/// An account allowed to sign in.
///
/// The password hash never leaves the process through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: Option<i64>,
    username: String,
    #[serde(skip)]
    password_hash: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Check a username: at least three ASCII letters, digits, `_`, `-` or `.`.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `username` field.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate::required("username", username)?;
    validate::min_length("username", username, MIN_USERNAME_LENGTH)?;
    validate::charset(
        "username",
        username,
        |c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'),
        "ASCII letters, digits, '_', '-' and '.'",
    )
}

impl User {
    /// Validate and build an unpersisted user.
    ///
    /// `password_hash` must already be a PHC-format hash; plaintext is never
    /// accepted here.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn new(fields: NewUser) -> Result<Self, ValidationError> {
        validate_username(&fields.username)?;
        validate::required("password_hash", &fields.password_hash)?;
        if !fields.password_hash.starts_with('$') {
            return Err(ValidationError::new(
                "password_hash",
                Rule::Format("a PHC-format hash string"),
            ));
        }

        Ok(Self {
            id: None,
            username: fields.username,
            password_hash: fields.password_hash,
            role: fields.role,
            created_at: fields.created_at,
        })
    }

    /// Attach the identifier assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyPersisted`] if an id is already set.
    pub fn with_id(mut self, id: i64) -> Result<Self, CoreError> {
        super::assign_id(&mut self.id, EntityKind::User, id)?;
        Ok(self)
    }

    #[must_use]
    pub fn to_new(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: HASH.into(),
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("alice")]
    #[case("bob_2")]
    #[case("first.last-1")]
    fn accepts_valid_usernames(#[case] name: &str) {
        assert!(User::new(new_user(name)).is_ok());
    }

    #[rstest]
    #[case("al", Rule::MinLength(3))]
    #[case("a,b,c", Rule::Charset("ASCII letters, digits, '_', '-' and '.'"))]
    #[case("john doe", Rule::Charset("ASCII letters, digits, '_', '-' and '.'"))]
    #[case("", Rule::Required)]
    fn rejects_invalid_usernames(#[case] name: &str, #[case] rule: Rule) {
        let err = User::new(new_user(name)).unwrap_err();
        assert_eq!(err, ValidationError::new("username", rule));
    }

    #[test]
    fn plaintext_password_is_rejected() {
        let err = User::new(NewUser {
            password_hash: "hunter22".into(),
            ..new_user("alice")
        })
        .unwrap_err();
        assert_eq!(err.field, "password_hash");
    }

    #[test]
    fn hash_is_not_serialized() {
        let user = User::new(NewUser {
            role: UserRole::Admin,
            ..new_user("alice")
        })
        .unwrap();
        assert!(user.is_admin());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
