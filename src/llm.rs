use async_trait::async_trait;
use serde::Serialize;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use crate::config::{Config, LlmProvider};
use crate::error::{Result, AppError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// A hosted text-generation model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Submit one prompt and return the model's text verbatim.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// Builds the client selected by `config.provider`.
pub fn client_from_config(config: &Config) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::new(
            config.api_key.clone(),
            config.model.clone(),
            config.llm_base_url.clone(),
            config.llm_timeout,
        )?),
        LlmProvider::OpenRouter => Arc::new(OpenRouterClient::new(
            config.api_key.clone(),
            config.model.clone(),
            config.llm_base_url.clone(),
            config.llm_timeout,
        )?),
    };
    Ok(client)
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

// Error text is shown to API callers and must never carry a request URL.
async fn read_json(res: reqwest::Response, provider: &str) -> Result<serde_json::Value> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AppError::Llm(format!("{} API error ({}): {}", provider, status, body)));
    }

    res.json()
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse {} response: {}", provider, e.without_url())))
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

/// Google Generative Language API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: GeminiGenerationConfig { temperature },
        };

        tracing::debug!(%url, "sending Gemini request");
        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Gemini request failed: {}", e.without_url())))?;

        let json = read_json(res, "Gemini").await?;
        let reply = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))?
            .to_string();

        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "user".into(),
                    content: prompt.into(),
                }
            ],
            temperature,
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "News Summarizer")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("OpenRouter request failed: {}", e.without_url())))?;

        let json = read_json(res, "OpenRouter").await?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))?
            .to_string();

        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
