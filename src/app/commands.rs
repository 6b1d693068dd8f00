//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::constants::SUBMIT_ERROR;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, PushStatus};
use crate::models::Post;

impl AppState {
    // ========================
    // Lifecycle
    // ========================

    /// Commands issued when the board is mounted: the initial fetch and the
    /// push subscription, with no coordination between them.
    pub fn mount(&mut self) -> Vec<NetworkCommand> {
        let fetch_id = self.next_id();
        let subscription_id = self.next_id();
        self.fetch_id = Some(fetch_id);
        self.subscription_id = Some(subscription_id);
        self.push_status = PushStatus::Connecting;

        vec![
            NetworkCommand::FetchPosts { id: fetch_id },
            NetworkCommand::Subscribe {
                id: subscription_id,
            },
        ]
    }

    /// Tear down the push subscription
    pub fn unmount(&mut self) -> Option<NetworkCommand> {
        let id = self.subscription_id.take()?;
        self.push_status = PushStatus::Closed;
        Some(NetworkCommand::Unsubscribe(id))
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.form.cursor_position = self.form.input.len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = &self.form.input;
        let cursor = self.form.cursor_position;
        if cursor > 0 {
            self.form.cursor_position = input[..cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = &self.form.input;
        let cursor = self.form.cursor_position;
        if cursor < input.len() {
            self.form.cursor_position = input[cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| cursor + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor = self.form.cursor_position;
        if cursor <= self.form.input.len() {
            self.form.input.insert(cursor, c);
            self.form.cursor_position = cursor + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        let cursor = self.form.cursor_position;
        if cursor > 0 {
            let prev = self.form.input[..cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.form.input.remove(prev);
            self.form.cursor_position = prev;
        }
    }

    // ========================
    // List scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.list_scroll = self.list_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = u16::try_from(self.store.len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.list_scroll = self.list_scroll.saturating_add(1).min(max);
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Submission
    // ========================

    /// Submit the current input stamped with the current time
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        self.submit_at(chrono::Utc::now().timestamp_millis())
    }

    /// Submit the current input with the given timestamp.
    ///
    /// Returns None while a previous submission is still in flight.
    pub fn submit_at(&mut self, timestamp: i64) -> Option<NetworkCommand> {
        if self.form.sending {
            return None;
        }

        self.form.sending = true;
        let id = self.next_id();
        self.form.pending_submit_id = Some(id);

        Some(NetworkCommand::SubmitPost {
            id,
            post: Post::new(self.form.input.clone(), timestamp),
        })
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let response_id = response.id();

        match response {
            NetworkResponse::PostsLoaded { posts, .. } => {
                if self.fetch_id == Some(response_id) {
                    self.fetch_id = None;
                    self.store.replace_all(posts);
                }
            }
            NetworkResponse::PostsFailed { message, .. } => {
                // Not surfaced: the board stays in its loading state
                if self.fetch_id == Some(response_id) {
                    self.fetch_id = None;
                    tracing::warn!(id = response_id, error = %message, "Initial fetch failed");
                }
            }
            NetworkResponse::SubmitSucceeded { .. } => {
                if self.form.pending_submit_id == Some(response_id) {
                    self.form.error.clear();
                    self.form.input.clear();
                    self.form.cursor_position = 0;
                    self.finalize_submit();
                }
            }
            NetworkResponse::SubmitFailed { message, .. } => {
                if self.form.pending_submit_id == Some(response_id) {
                    tracing::warn!(id = response_id, error = %message, "Submission failed");
                    self.form.error = SUBMIT_ERROR.to_string();
                    self.finalize_submit();
                }
            }
            NetworkResponse::SubscriptionOpened { .. } => {
                if self.subscription_id == Some(response_id) {
                    self.push_status = PushStatus::Open;
                }
            }
            NetworkResponse::PostPushed { post, .. } => {
                if self.subscription_id == Some(response_id) && !self.store.append(post) {
                    tracing::debug!(id = response_id, "Dropped push event received before initial fetch");
                }
            }
            NetworkResponse::SubscriptionClosed { reason, .. } => {
                if self.subscription_id == Some(response_id) {
                    self.push_status = PushStatus::Closed;
                    tracing::info!(id = response_id, reason = ?reason, "Push channel closed");
                }
            }
        }
    }

    fn finalize_submit(&mut self) {
        self.form.sending = false;
        self.form.pending_submit_id = None;
    }
}
