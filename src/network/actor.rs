//! Network actor - runs board requests and the push channel in Tokio async runtime

use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, fetch_posts, submit_post, updates_url};
use crate::network::sse::{Subscription, SubscriptionEvent};

/// Network actor that processes board commands
pub struct NetworkActor {
    client: reqwest::Client,
    base_url: String,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
    subscriptions: HashMap<u64, Subscription>,
}

impl NetworkActor {
    pub fn new(base_url: impl Into<String>, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client: create_client(),
            base_url: base_url.into(),
            response_tx,
            active_requests: JoinSet::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchPosts { id }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, base_url = %base_url, "Fetching posts");
                                let result = fetch_posts(&client, &base_url, id).await;
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::SubmitPost { id, post }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let base_url = self.base_url.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, timestamp = post.timestamp, "Submitting post");
                                let result = submit_post(&client, &base_url, id, &post).await;
                                tracing::info!(id, result = ?result, "Submission completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Subscribe { id }) => {
                            let response_tx = self.response_tx.clone();
                            let url = updates_url(&self.base_url);
                            tracing::info!(id, url = %url, "Opening push channel");

                            let subscription = Subscription::open(self.client.clone(), url, move |event| {
                                let response = match event {
                                    SubscriptionEvent::Opened => NetworkResponse::SubscriptionOpened { id },
                                    SubscriptionEvent::Post(post) => NetworkResponse::PostPushed { id, post },
                                    SubscriptionEvent::Closed(reason) => NetworkResponse::SubscriptionClosed { id, reason },
                                };
                                let _ = response_tx.send(response);
                            });
                            self.subscriptions.insert(id, subscription);
                        }

                        Some(NetworkCommand::Unsubscribe(id)) => {
                            if let Some(subscription) = self.subscriptions.remove(&id) {
                                tracing::info!(id, "Closing push channel");
                                subscription.cancel();
                            }
                        }

                        Some(NetworkCommand::Shutdown) => {
                            for (_, subscription) in self.subscriptions.drain() {
                                subscription.cancel();
                            }
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {
                    self.subscriptions.retain(|_, subscription| !subscription.is_finished());
                }
            }
        }
    }
}
