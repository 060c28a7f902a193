// error.rs
use crate::color::ColorError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

/// Bad form input. Rendered as a plain 400, the page is not re-rendered.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing form field {0}")]
    MissingField(&'static str),
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("Rejected request: {}", self);
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_is_a_bad_request() {
        let response = AppError::MissingField("hex_color").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(ColorError::MissingChannel("red")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
