// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "commands/mod.rs"]
pub mod commands;

#[path = "config/bot_config.rs"]
pub mod config;

#[path = "leveling/mod.rs"]
pub mod leveling;
