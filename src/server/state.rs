//! Shared server state

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::constants::UPDATE_CHANNEL_CAPACITY;
use crate::models::Post;

/// Post list plus the channel every `/updates` stream subscribes to
#[derive(Clone)]
pub struct BoardState {
    pub posts: Arc<Mutex<Vec<Post>>>,
    pub updates: broadcast::Sender<Post>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    /// State seeded with an initial post list
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let (sender, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        BoardState {
            posts: Arc::new(Mutex::new(posts)),
            updates: sender,
        }
    }

    /// Store a post and broadcast it to every live subscriber.
    ///
    /// Returns how many subscribers it was delivered to.
    pub async fn append(&self, post: Post) -> usize {
        self.posts.lock().await.push(post.clone());
        self.publish(post)
    }

    /// Broadcast without storing
    pub fn publish(&self, post: Post) -> usize {
        // No subscribers is not an error
        self.updates.send(post).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Post> {
        self.updates.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }
}
