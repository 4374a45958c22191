use serde::Serialize;

pub mod dataset;
pub mod dispatch;
pub mod import;
pub mod incident;
pub mod init;
pub mod shared;
pub mod ticket;
pub mod user;

/// Response for every `delete` subcommand.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

impl Deleted {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { deleted: id }
    }
}
