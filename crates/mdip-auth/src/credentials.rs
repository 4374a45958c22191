//! First-run seeding from a users text file.
//!
//! One account per line: `username,password_hash[,role]`. Blank lines and
//! lines starting with `#` are ignored. The hash must be an Argon2 PHC
//! string; the role defaults to `user`.

use std::path::Path;

use chrono::Utc;
use mdip_core::entities::{NewUser, User};
use mdip_core::enums::UserRole;
use mdip_db::Store;
use mdip_db::error::DatabaseError;
use mdip_db::repos::{Repository, UserRepo};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::password::is_supported_hash;

/// A line that could not be turned into an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub created: usize,
    pub skipped_existing: usize,
    pub failures: Vec<LineFailure>,
}

/// Parse one non-comment line into an unpersisted user.
///
/// Argon2 PHC strings carry commas in their parameter block
/// (`m=19456,t=2,p=1`), so the line is not split on every comma. The
/// username ends at the first comma. A trailing field is a role only when
/// it holds no `$`; anything else still belongs to the hash.
///
/// # Errors
///
/// A human-readable reason when the line is malformed.
pub fn parse_line(line: &str) -> Result<User, String> {
    let Some((username, rest)) = line.split_once(',') else {
        return Err("expected username,password_hash[,role]".to_string());
    };
    let (hash, role) = match rest.rsplit_once(',') {
        Some((hash, role)) if !role.contains('$') => (
            hash,
            role.trim().parse::<UserRole>().map_err(|e| e.to_string())?,
        ),
        _ => (rest, UserRole::default()),
    };
    let hash = hash.trim();
    if !is_supported_hash(hash) {
        return Err("password hash is not an Argon2 PHC string".to_string());
    }
    User::new(NewUser {
        username: username.trim().to_string(),
        password_hash: hash.to_string(),
        role,
        created_at: Utc::now(),
    })
    .map_err(|e| e.to_string())
}

/// Create every account listed in `contents` that does not exist yet.
///
/// # Errors
///
/// Store failures only; malformed lines land in [`SeedReport::failures`].
pub async fn seed_from_str(store: &Store, contents: &str) -> Result<SeedReport, AuthError> {
    let repo = UserRepo::new(store);
    let mut report = SeedReport::default();

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let user = match parse_line(trimmed) {
            Ok(user) => user,
            Err(reason) => {
                warn!(line, %reason, "skipping credentials line");
                report.failures.push(LineFailure { line, reason });
                continue;
            }
        };
        match repo.create(&user).await {
            Ok(_) => report.created += 1,
            Err(DatabaseError::Conflict { .. }) => report.skipped_existing += 1,
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        created = report.created,
        skipped = report.skipped_existing,
        failed = report.failures.len(),
        "credentials seeded"
    );
    Ok(report)
}

/// Read `path` and seed from it.
///
/// # Errors
///
/// `CredentialsFile` if the file cannot be read, plus everything
/// [`seed_from_str`] returns.
pub async fn seed_from_file(store: &Store, path: &Path) -> Result<SeedReport, AuthError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AuthError::CredentialsFile {
        path: path.to_path_buf(),
        source,
    })?;
    seed_from_str(store, &contents).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const BCRYPT: &str = "$2b$12$KIXQJ8pFZ0h0Xb1Yc7mR1uW2v3x4y5z6A7B8C9D0E1F2G3H4I5J6K";

    #[rstest]
    #[case::no_hash("alice", "expected username,password_hash")]
    #[case::extra_field("alice,$argon2id$x,admin,extra", "'extra' is not one of")]
    #[case::bcrypt(
        "alice,$2b$12$KIXQJ8pFZ0h0Xb1Yc7mR1uW2v3x4y5z6A7B8C9D0E1F2G3H4I5J6K",
        "not an Argon2"
    )]
    #[case::plaintext("alice,hunter22", "not an Argon2")]
    fn malformed_lines(#[case] line: &str, #[case] reason: &str) {
        let err = parse_line(line).unwrap_err();
        assert!(err.contains(reason), "{err}");
    }

    #[test]
    fn real_hash_with_parameter_commas_parses() {
        let hash = hash_password("pw123456").unwrap();
        assert!(hash.contains("m=") && hash.contains(','), "{hash}");

        let user = parse_line(&format!("admin,{hash},admin")).unwrap();
        assert_eq!(user.username(), "admin");
        assert_eq!(user.password_hash(), hash);
        assert_eq!(user.role(), UserRole::Admin);

        let plain = parse_line(&format!("analyst,{hash}")).unwrap();
        assert_eq!(plain.password_hash(), hash);
        assert_eq!(plain.role(), UserRole::User);
    }

    #[test]
    fn role_defaults_to_user_and_can_be_admin() {
        let hash = hash_password("pw123456").unwrap();
        let plain = parse_line(&format!("alice,{hash}")).unwrap();
        assert_eq!(plain.role(), UserRole::User);
        let admin = parse_line(&format!("root_admin, {hash} , admin")).unwrap();
        assert_eq!(admin.role(), UserRole::Admin);
        assert!(parse_line(&format!("bob,{hash},owner")).is_err());
    }

    #[tokio::test]
    async fn seeding_twice_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_local(dir.path().join("seed.db").to_str().unwrap())
            .await
            .unwrap();
        let hash = hash_password("pw123456").unwrap();
        let contents = format!(
            "# bootstrap accounts\n\nalice,{hash}\nbob,{hash},admin\ncarol,{BCRYPT}\n"
        );

        let first = seed_from_str(&store, &contents).await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(first.skipped_existing, 0);
        assert_eq!(first.failures.len(), 1);
        assert_eq!(first.failures[0].line, 5);

        let second = seed_from_str(&store, &contents).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped_existing, 2);
    }

    #[tokio::test]
    async fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_local(dir.path().join("seed.db").to_str().unwrap())
            .await
            .unwrap();
        let err = seed_from_file(&store, &dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CredentialsFile { .. }));
    }
}
