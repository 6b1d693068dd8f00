//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default server the client connects to
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Default bind host for `postboard serve`
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port for `postboard serve`
pub const DEFAULT_PORT: u16 = 8080;

/// Default client log file (the terminal belongs to the UI)
pub const DEFAULT_LOG_FILE: &str = "postboard.log";

/// Path serving the full post list (GET) and accepting new posts (POST)
pub const POSTS_PATH: &str = "/posts";

/// Path of the Server-Sent Events push channel
pub const UPDATES_PATH: &str = "/updates";

/// SSE event type carrying a new post
pub const MESSAGE_EVENT: &str = "message";

/// Error shown by the form when a submission fails
pub const SUBMIT_ERROR: &str = "Failed to submit new post.";

/// Capacity of the server's update broadcast channel
pub const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Application name
pub const APP_NAME: &str = "postboard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
