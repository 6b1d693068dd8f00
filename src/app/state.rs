//! App state - pure data structure with no I/O logic

use crate::messages::ui_events::InputMode;
use crate::messages::{PushStatus, RenderState};
use crate::store::PostStore;

/// Submission form fields
#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub input: String,
    pub cursor_position: usize,
    pub error: String,
    /// Set while a submission is in flight; the submit control is disabled
    pub sending: bool,
    pub pending_submit_id: Option<u64>,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub server_url: String,

    // Posts
    pub store: PostStore,
    pub fetch_id: Option<u64>,
    pub subscription_id: Option<u64>,
    pub push_status: PushStatus,

    // Form
    pub form: FormState,

    // UI state
    pub input_mode: InputMode,
    pub list_scroll: u16,
    pub show_help: bool,

    pub next_command_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SERVER_URL)
    }
}

impl AppState {
    pub fn new(server_url: impl Into<String>) -> Self {
        AppState {
            server_url: server_url.into(),
            store: PostStore::new(),
            fetch_id: None,
            subscription_id: None,
            push_status: PushStatus::Connecting,
            form: FormState::default(),
            input_mode: InputMode::Normal,
            list_scroll: 0,
            show_help: false,
            next_command_id: 1,
        }
    }

    /// Generate a unique command ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_command_id;
        self.next_command_id += 1;
        id
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            loaded: self.store.is_loaded(),
            posts: self.store.posts().to_vec(),
            list_scroll: self.list_scroll,
            push_status: self.push_status,
            input: self.form.input.clone(),
            cursor_position: self.form.cursor_position,
            error: self.form.error.clone(),
            sending: self.form.sending,
            input_mode: self.input_mode,
            show_help: self.show_help,
            server_url: self.server_url.clone(),
        }
    }
}
