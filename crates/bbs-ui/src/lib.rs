//! Navigation for the BBS client.
//!
//! State changes flow one way: a `UiEvent` goes through `update::update`,
//! which mutates `AppState` and returns `UiEffect`s. The `Runtime` executes
//! effects against the client and feeds completions back as events.

pub mod commands;
pub mod effects;
pub mod events;
pub mod render;
pub mod request;
pub mod runtime;
pub mod state;
pub mod update;

pub use effects::UiEffect;
pub use events::UiEvent;
pub use runtime::Runtime;
pub use state::{AppState, Page};
