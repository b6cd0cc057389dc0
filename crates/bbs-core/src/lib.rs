//! Core BBS library (data model, store, query evaluator, client, config).

pub mod client;
pub mod config;
pub mod format;
pub mod forms;
pub mod logging;
pub mod models;
pub mod query;
pub mod seed;
pub mod store;
