use std::sync::Arc;
use tokio::net::TcpListener;
use news_summarizer::{
    config::Config,
    api::routes::create_router,
    llm::client_from_config,
    logging::init_tracing,
    scraper::Fetcher,
    summarizer::Summarizer,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    // Clients are built once and shared by every request
    let fetcher = Fetcher::new(config.fetch_timeout)?;
    let llm = client_from_config(&config)?;
    tracing::info!(provider = ?config.provider, model = llm.model_name(), "LLM client ready");

    let summarizer = Summarizer::new(fetcher, llm, config.temperature);
    let app_state = AppState {
        config: Arc::new(config),
        summarizer: Arc::new(summarizer),
    };

    let app = create_router(app_state);
    let listener = TcpListener::bind(server_addr).await?;

    tracing::info!(%server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
