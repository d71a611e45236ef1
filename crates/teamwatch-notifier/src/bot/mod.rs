//! Bot front end
//!
//! - `commands` - parsing and handling of chat commands
//! - `maintenance` - shared maintenance flag
//! - `listener` - long-poll loop feeding updates to the dispatcher

mod commands;
mod listener;
mod maintenance;

pub use commands::{Command, CommandDispatcher};
pub use listener::UpdateListener;
pub use maintenance::MaintenanceMode;
