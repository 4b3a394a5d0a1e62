use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::time::Instant;

use crate::error::AppError;
use crate::api::models::{HealthResponse, SummarizeRequest};
use crate::api::response;
use crate::AppState;

const INDEX_HTML: &str = include_str!("index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        model: state.summarizer.model_name().to_string(),
    })
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "malformed summarize request");
            return response::error::<()>(StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    tracing::info!(url = %req.url, "processing summarize request");
    let start_time = Instant::now();

    // Set an overall timeout for the entire handler
    let result = tokio::time::timeout(
        state.config.request_timeout,
        state.summarizer.summarize_url(&req.url),
    )
    .await;

    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(report)) => {
            tracing::info!(url = %req.url, ?elapsed, words = report.word_count, "summary ready");
            response::success(report).into_response()
        }
        Ok(Err(err)) => {
            match &err {
                AppError::Fetch { .. } | AppError::InvalidRequest(_) => {
                    tracing::warn!(url = %req.url, ?elapsed, error = %err, "request rejected");
                }
                AppError::Llm(_) | AppError::Config(_) => {
                    tracing::error!(url = %req.url, ?elapsed, error = %err, "request failed");
                }
            }
            err.into_response()
        }
        Err(_) => {
            tracing::error!(url = %req.url, ?elapsed, "request timed out");
            response::error::<()>(
                StatusCode::REQUEST_TIMEOUT,
                "Request processing timed out",
            )
            .into_response()
        }
    }
}
