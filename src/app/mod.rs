//! App layer - owns the post store and the submission form
//!
//! The App actor receives UI events and network responses,
//! updates state, and emits network commands and render state.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::{AppState, FormState};
pub use actor::AppActor;
