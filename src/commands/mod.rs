//! CLI commands

pub mod add;
pub mod init;
pub mod list;
pub mod remove;
pub mod update;
