//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        server_url: impl Into<String>,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(server_url),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        for cmd in self.state.mount() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        if let Some(cmd) = self.state.unmount() {
                            let _ = self.network_tx.send(cmd);
                        }
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Form
            UiEvent::Submit => {
                if let Some(cmd) = self.state.submit() {
                    let _ = self.network_tx.send(cmd);
                }
            }

            // List
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;

    #[tokio::test]
    async fn test_actor_mounts_and_tears_down() {
        let (net_tx, mut net_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new("http://localhost:1", net_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, resp_rx));

        let fetch_id = match net_rx.recv().await {
            Some(NetworkCommand::FetchPosts { id }) => id,
            other => panic!("expected FetchPosts, got {:?}", other),
        };
        let sub_id = match net_rx.recv().await {
            Some(NetworkCommand::Subscribe { id }) => id,
            other => panic!("expected Subscribe, got {:?}", other),
        };
        assert!(!render_rx.recv().await.unwrap().loaded);

        resp_tx
            .send(NetworkResponse::PostsLoaded {
                id: fetch_id,
                posts: vec![Post::new("hi", 1)],
            })
            .unwrap();
        let rendered = render_rx.recv().await.unwrap();
        assert!(rendered.loaded);
        assert_eq!(rendered.posts, vec![Post::new("hi", 1)]);

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(net_rx.recv().await, Some(NetworkCommand::Unsubscribe(id)) if id == sub_id));
        assert!(matches!(net_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
