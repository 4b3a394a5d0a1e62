use std::sync::Arc;
use std::time::Instant;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::error::{AppError, Result};
use crate::llm::LlmClient;
use crate::scraper::{extract_paragraphs, Fetcher};

pub const PROMPT_PREFIX: &str = "Summarize the following news article:";
pub const PROMPT_SUFFIX: &str = "Summary:";

pub fn build_prompt(article: &str) -> String {
    let mut result = String::with_capacity(PROMPT_PREFIX.len() + article.len() + PROMPT_SUFFIX.len() + 4);
    result.push_str(PROMPT_PREFIX);
    result.push_str("\n\n");
    result.push_str(article);
    result.push_str("\n\n");
    result.push_str(PROMPT_SUFFIX);
    result
}

/// Outcome of a successful run over one URL.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub url: String,
    pub summary: String,
    pub model: String,
    pub word_count: usize,
    pub summarized_at: DateTime<Utc>,
}

/// Fetch, extract and summarize, with both clients injected at construction.
pub struct Summarizer {
    fetcher: Fetcher,
    llm: Arc<dyn LlmClient>,
    temperature: f32,
}

impl Summarizer {
    pub fn new(fetcher: Fetcher, llm: Arc<dyn LlmClient>, temperature: f32) -> Self {
        Self {
            fetcher,
            llm,
            temperature,
        }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Fetch failures pass through untouched and the model is never called.
    pub async fn summarize(&self, article: Result<String>) -> Result<String> {
        let article = article?;

        let prompt = build_prompt(&article);
        tracing::debug!(prompt_len = prompt.len(), model = self.llm.model_name(), "calling LLM");
        let started = Instant::now();

        match self.llm.generate(&prompt, self.temperature).await {
            Ok(summary) => {
                tracing::info!(elapsed = ?started.elapsed(), "LLM call succeeded");
                Ok(summary)
            }
            Err(AppError::Llm(msg)) => {
                tracing::error!(error = %msg, "LLM call failed");
                Err(AppError::Llm(msg))
            }
            Err(other) => {
                tracing::error!(error = %other, "LLM call failed");
                Err(AppError::Llm(other.to_string()))
            }
        }
    }

    pub async fn summarize_url(&self, url: &str) -> Result<SummaryReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidRequest("Please enter a valid URL.".to_string()));
        }

        let article = self.fetcher.fetch(url).await.map(|html| extract_paragraphs(&html));

        let word_count = match &article {
            Ok(text) => {
                let words = text.split_whitespace().count();
                if text.is_empty() {
                    tracing::warn!(%url, "no paragraph text found; summarizing an empty article");
                }
                tracing::info!(%url, chars = text.len(), words, "article extracted");
                words
            }
            Err(_) => 0,
        };

        let summary = self.summarize(article).await?;

        Ok(SummaryReport {
            url: url.to_string(),
            summary,
            model: self.llm.model_name().to_string(),
            word_count,
            summarized_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingLlm {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for RecordingLlm {
        async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(AppError::Llm)
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn summarizer(llm: Arc<RecordingLlm>) -> Summarizer {
        let fetcher = Fetcher::new(Duration::from_secs(1)).unwrap();
        Summarizer::new(fetcher, llm, 0.7)
    }

    #[test]
    fn prompt_wraps_article_between_prefix_and_suffix() {
        assert_eq!(
            build_prompt("Hello World"),
            "Summarize the following news article:\n\nHello World\n\nSummary:"
        );
    }

    #[tokio::test]
    async fn fetch_failure_short_circuits_without_calling_model() {
        let llm = RecordingLlm::replying("unused");
        let summarizer = summarizer(llm.clone());

        let failure = AppError::fetch("https://news.example/a", "timed out");
        let expected = failure.to_string();

        let err = summarizer.summarize(Err(failure)).await.unwrap_err();

        assert_eq!(err.to_string(), expected);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn article_text_is_sent_once_and_reply_returned_verbatim() {
        let llm = RecordingLlm::replying("  A greeting.\n");
        let summarizer = summarizer(llm.clone());

        let summary = summarizer.summarize(Ok("Hello World".into())).await.unwrap();

        assert_eq!(summary, "  A greeting.\n");
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with(PROMPT_PREFIX));
        assert!(prompts[0].contains("Hello World"));
        assert!(prompts[0].ends_with(PROMPT_SUFFIX));
    }

    #[tokio::test]
    async fn summary_starting_with_marker_is_still_a_success() {
        let llm = RecordingLlm::replying("❌ is the emoji the article is about.");
        let summarizer = summarizer(llm.clone());

        let summary = summarizer.summarize(Ok("Emoji news".into())).await.unwrap();
        assert!(summary.starts_with(crate::error::FAILURE_SENTINEL));
    }

    #[tokio::test]
    async fn model_failure_is_returned_as_llm_error() {
        let llm = RecordingLlm::failing("quota exceeded");
        let summarizer = summarizer(llm.clone());

        let err = summarizer.summarize(Ok("text".into())).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("quota exceeded")));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn blank_url_is_rejected_before_fetching() {
        let llm = RecordingLlm::replying("unused");
        let summarizer = summarizer(llm.clone());

        let err = summarizer.summarize_url("   ").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert_eq!(llm.calls(), 0);
    }
}
