//! CLI command handlers.

pub mod board;
pub mod browse;
pub mod config;
pub mod search;
pub mod threads;
