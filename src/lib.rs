//! # postboard
//!
//! A live message board: post short messages, watch everyone's posts stream in.
//!
//! ## Features
//! - Terminal client with a submit form above the post list
//! - Initial fetch of every post, then live updates over Server-Sent Events
//! - Small axum server holding posts in memory and fanning them out
//!
//! ## Architecture
//! Client is actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (post store + form state machine)
//! - Network Layer (Tokio runtime, HTTP + push subscription)

pub mod constants;
pub mod models;
pub mod store;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;
pub mod server;

// Re-export commonly used types
pub use models::Post;
pub use store::PostStore;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState, PushStatus};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, Subscription, SubscriptionEvent};
pub use server::BoardState;
