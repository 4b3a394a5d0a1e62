use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

/// Leading marker of every fetch failure message shown to the user.
pub const FAILURE_SENTINEL: &str = "❌";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("❌ Failed to fetch news from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("LLM processing error: {0}")]
    Llm(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn fetch(url: &str, err: impl std::fmt::Display) -> Self {
        AppError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fetch { .. } => StatusCode::BAD_REQUEST,
            AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        crate::api::response::error::<()>(status, self.to_string()).into_response()
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
