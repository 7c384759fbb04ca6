pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod format;
pub mod gate;
pub mod github;
pub mod operations;
pub mod progress;
pub mod prompt;
pub mod snapshot;
