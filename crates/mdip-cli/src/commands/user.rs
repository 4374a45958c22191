use std::path::PathBuf;

use anyhow::Context;
use mdip_auth::{login, register, seed_from_file};
use mdip_core::enums::UserRole;
use mdip_db::repos::{Repository, UserFilter, UserRepo};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `mdip user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Register {
            username,
            password,
            role,
        } => {
            let role: UserRole = parse_enum(role, "role")?;
            let user = register(
                &ctx.store,
                username,
                password,
                role,
                ctx.config.auth.min_password_length,
            )
            .await?;
            output(&user, flags.format)
        }
        UserCommands::Login { username, password } => {
            let user = login(&ctx.store, username, password).await?;
            output(&user, flags.format)
        }
        UserCommands::List { role, limit } => {
            let filter = UserFilter {
                role: role
                    .as_deref()
                    .map(|r| parse_enum(r, "role"))
                    .transpose()?,
                limit: Some(ctx.limit(*limit, flags)),
            };
            output(&UserRepo::new(&ctx.store).list(&filter).await?, flags.format)
        }
        UserCommands::Seed { file } => {
            let path = file
                .as_ref()
                .map_or_else(|| ctx.config.auth.users_file(), PathBuf::from);
            let report = seed_from_file(&ctx.store, &path)
                .await
                .with_context(|| format!("failed to seed accounts from {}", path.display()))?;
            output(&report, flags.format)
        }
    }
}
