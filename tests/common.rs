#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use news_summarizer::config::Config;
use news_summarizer::llm::GeminiClient;
use news_summarizer::scraper::Fetcher;
use news_summarizer::summarizer::Summarizer;
use news_summarizer::AppState;
use serde_json::{json, Value};

pub const MODEL: &str = "test-model";
pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/models/test-model:generateContent";

pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] }, "finishReason": "STOP" }
        ]
    })
}

pub fn gemini(model_uri: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(
        API_KEY.to_string(),
        MODEL.to_string(),
        Some(model_uri.to_string()),
        timeout,
    )
    .expect("gemini client")
}

pub fn summarizer(model_uri: &str, fetch_timeout: Duration) -> Summarizer {
    let fetcher = Fetcher::new(fetch_timeout).expect("fetcher");
    let llm = gemini(model_uri, Duration::from_secs(5));

    Summarizer::new(fetcher, Arc::new(llm), 0.7)
}

pub fn app_state(model_uri: &str, fetch_timeout: Duration) -> AppState {
    app_state_with_request_timeout(model_uri, fetch_timeout, 10)
}

pub fn app_state_with_request_timeout(model_uri: &str, fetch_timeout: Duration, request_timeout_secs: u64) -> AppState {
    let model_uri = model_uri.to_string();
    let config = Config::from_lookup(|key| match key {
        "GOOGLE_API_KEY" => Some(API_KEY.to_string()),
        "LLM_MODEL" => Some(MODEL.to_string()),
        "LLM_BASE_URL" => Some(model_uri.clone()),
        "REQUEST_TIMEOUT_SECS" => Some(request_timeout_secs.to_string()),
        _ => None,
    })
    .expect("config");

    AppState {
        config: Arc::new(config),
        summarizer: Arc::new(summarizer(&model_uri, fetch_timeout)),
    }
}
