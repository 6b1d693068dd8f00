//! Board server - in-memory post list with a Server-Sent Events fan-out
//!
//! `GET /posts` returns every post, `POST /posts` appends one and broadcasts
//! it, `GET /updates` streams broadcasts to each connected client.

pub mod error;
pub mod router;
pub mod state;

pub use error::ServerError;
pub use router::create;
pub use state::BoardState;

use tokio::net::TcpListener;

/// Bind `host:port` and serve the board until the process exits
pub async fn serve(host: &str, port: u16, state: BoardState) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on {}...", bind_addr);

    serve_on(listener, state).await
}

/// Serve the board on an already bound listener
pub async fn serve_on(listener: TcpListener, state: BoardState) -> anyhow::Result<()> {
    axum::serve(listener, create(state)).await?;
    Ok(())
}
