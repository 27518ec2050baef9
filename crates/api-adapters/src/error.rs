//! HTTP-facing errors for the page routes. JSON routes build their own
//! failure bodies so the client always sees the `success` flag.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domains::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error rendering page")]
    Render(#[from] askama::Error),

    #[error("Error searching boards")]
    SearchFailed(#[source] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Render(_) | ApiError::SearchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
