// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the UI/CLI and Services
// - Commands accept DTOs, return DTOs
// - Commands convert errors to ErrorResponse
// - Commands NEVER contain business logic

pub mod achievement_commands;
pub mod catalog_commands;

pub use achievement_commands::*;
pub use catalog_commands::*;
