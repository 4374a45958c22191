//! User patch. Usernames are fixed once created.

use mdip_core::entities::NewUser;
use mdip_core::enums::UserRole;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

impl UserPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn apply(self, mut base: NewUser) -> NewUser {
        if let Some(hash) = self.password_hash {
            base.password_hash = hash;
        }
        if let Some(role) = self.role {
            base.role = role;
        }
        base
    }
}
