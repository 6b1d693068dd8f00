//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::InputMode;
use crate::models::Post;

/// State of the push channel as last reported by the Network layer
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PushStatus {
    #[default]
    Connecting,
    Open,
    Closed,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Store
    /// False until the initial fetch resolves (loading boundary)
    pub loaded: bool,
    pub posts: Vec<Post>,
    pub list_scroll: u16,
    pub push_status: PushStatus,

    // Form
    pub input: String,
    pub cursor_position: usize,
    pub error: String,
    /// Submit control is disabled while true
    pub sending: bool,
    pub input_mode: InputMode,

    // Popups
    pub show_help: bool,

    pub server_url: String,
}
