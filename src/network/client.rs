//! HTTP client wrapper - the two one-shot calls against the board

use crate::constants::{APP_NAME, APP_VERSION, POSTS_PATH, UPDATES_PATH};
use crate::messages::NetworkResponse;
use crate::models::Post;

/// Join a server base URL and an absolute path
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn posts_url(base_url: &str) -> String {
    endpoint(base_url, POSTS_PATH)
}

pub fn updates_url(base_url: &str) -> String {
    endpoint(base_url, UPDATES_PATH)
}

/// Human readable description of a transport error
pub fn describe_error(e: &reqwest::Error) -> String {
    if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_decode() {
        format!("Invalid response body: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

/// Fetch the full post list
pub async fn fetch_posts(client: &reqwest::Client, base_url: &str, id: u64) -> NetworkResponse {
    let sent = client
        .get(posts_url(base_url))
        .send()
        .await
        .and_then(|resp| resp.error_for_status());

    let result = match sent {
        Ok(resp) => resp.json::<Vec<Post>>().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(posts) => NetworkResponse::PostsLoaded { id, posts },
        Err(e) => NetworkResponse::PostsFailed {
            id,
            message: describe_error(&e),
        },
    }
}

/// Submit a new post. Any 2xx status is success and the body is ignored.
pub async fn submit_post(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    post: &Post,
) -> NetworkResponse {
    let result = client.post(posts_url(base_url)).json(post).send().await;

    match result {
        Ok(resp) if resp.status().is_success() => NetworkResponse::SubmitSucceeded { id },
        Ok(resp) => NetworkResponse::SubmitFailed {
            id,
            message: format!("Server responded with {}", resp.status()),
        },
        Err(e) => NetworkResponse::SubmitFailed {
            id,
            message: describe_error(&e),
        },
    }
}

/// Create an HTTP client with default configuration.
///
/// No overall timeout: the same client carries the long-lived push channel.
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
