mod analysis;
mod config;
mod db;
mod document;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{AnalysisPipeline, PgAnalysisStore, PipelineSettings};
use crate::config::Config;
use crate::db::create_pool;
use crate::document::{DocIntelClient, HttpDocumentSource};
use crate::llm_client::{LlmClient, RetryPolicy};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analysis API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgAnalysisStore::new(db));

    // Document retrieval: Document Intelligence when configured, local PDF otherwise
    let doc_intel = match &config.doc_intel {
        Some(di) => {
            info!("Document intelligence enabled (model: {})", di.model);
            Some(DocIntelClient::new(&di.endpoint, &di.api_key, &di.model)?)
        }
        None => {
            info!("Document intelligence not configured, PDFs are extracted locally");
            None
        }
    };
    let documents = Arc::new(HttpDocumentSource::new(doc_intel)?);

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_api_url.clone(),
        config.llm_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let retry = RetryPolicy::default().with_max_attempts(config.llm_max_attempts);
    let settings = PipelineSettings {
        llm_extraction_enabled: config.llm_extraction_enabled,
        ..Default::default()
    };
    let pipeline = AnalysisPipeline::new(store, documents, Arc::new(llm), retry, settings);

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
