//! Network messages - communication between App and Network layers

use crate::models::Post;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the full post list (`GET /posts`)
    FetchPosts { id: u64 },
    /// Submit a new post (`POST /posts`)
    SubmitPost { id: u64, post: Post },
    /// Open the push subscription (`GET /updates`)
    Subscribe { id: u64 },
    /// Tear down the push subscription
    Unsubscribe(u64),

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Initial fetch resolved
    PostsLoaded { id: u64, posts: Vec<Post> },
    /// Initial fetch failed
    PostsFailed { id: u64, message: String },
    /// Submission accepted with a 2xx status
    SubmitSucceeded { id: u64 },
    /// Submission failed (network error or non-2xx status)
    SubmitFailed { id: u64, message: String },

    // Push channel responses
    /// Server accepted the subscription and the event stream is open
    SubscriptionOpened { id: u64 },
    /// A post arrived on the push channel
    PostPushed { id: u64, post: Post },
    /// The event stream ended or failed; it is not reopened
    SubscriptionClosed { id: u64, reason: Option<String> },
}

impl NetworkResponse {
    /// Get the command ID this response belongs to
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::PostsLoaded { id, .. } => *id,
            NetworkResponse::PostsFailed { id, .. } => *id,
            NetworkResponse::SubmitSucceeded { id, .. } => *id,
            NetworkResponse::SubmitFailed { id, .. } => *id,
            NetworkResponse::SubscriptionOpened { id } => *id,
            NetworkResponse::PostPushed { id, .. } => *id,
            NetworkResponse::SubscriptionClosed { id, .. } => *id,
        }
    }
}
