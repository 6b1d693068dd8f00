//! Server handler errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error returned by board handlers, rendered as a 500
#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        ServerError(err.into())
    }
}

pub type ServerResult<T> = std::result::Result<T, ServerError>;
