mod dataset;
mod incident;
mod ticket;
mod user;

pub use dataset::DatasetCommands;
pub use incident::IncidentCommands;
pub use ticket::TicketCommands;
pub use user::UserCommands;
