//! HTTP routes for the board

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::get,
    Json, Router,
};
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream, StreamExt,
};

use crate::constants::{POSTS_PATH, UPDATES_PATH};
use crate::models::Post;
use crate::server::error::ServerResult;
use crate::server::state::BoardState;

/// Router for the board API
pub fn create(state: BoardState) -> Router {
    Router::new()
        .route(UPDATES_PATH, get(stream_updates))
        .route(POSTS_PATH, get(fetch_posts).post(append_post))
        .with_state(state)
}

/// Server-Sent Events stream of every post broadcast after subscribing
async fn stream_updates(
    State(state): State<BoardState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.subscribe();
    tracing::info!(subscribers = state.subscriber_count(), "Update stream opened");

    let stream = BroadcastStream::new(receiver).filter_map(|post| match post {
        Ok(post) => match serde_json::to_string(&post) {
            Ok(json) => Some(Ok::<_, Infallible>(Event::default().data(json))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode post");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "Update stream lagged, skipping posts");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Every stored post, oldest first
async fn fetch_posts(State(state): State<BoardState>) -> ServerResult<Response> {
    let posts = state.posts.lock().await;

    // Serialize under the lock rather than cloning the list
    let json = serde_json::to_string(&*posts)?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))?)
}

/// Store a new post and broadcast it
async fn append_post(State(state): State<BoardState>, Json(post): Json<Post>) -> impl IntoResponse {
    let timestamp = post.timestamp;
    let delivered = state.append(post).await;
    tracing::info!(timestamp, delivered, "Post appended");

    StatusCode::NO_CONTENT
}
