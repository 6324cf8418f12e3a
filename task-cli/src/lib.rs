//! Terminal front end for a [`todo_list::TaskStore`].
//!
//! A session reads one command per line, applies it to the store and
//! re-renders the board. Nothing outlives the process.
pub mod command;
pub mod config;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use config::Settings;
pub use session::{Flow, Session};
