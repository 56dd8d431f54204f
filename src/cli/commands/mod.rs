//! CLI command handlers

mod complete;
mod config;
mod initiate;

pub(super) use complete::execute_complete_command;
pub(super) use config::execute_config_command;
pub(super) use initiate::execute_initiate_command;
