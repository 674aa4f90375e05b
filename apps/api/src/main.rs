mod archive;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod matching;
mod models;
mod routes;
mod screening;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::archive::{DocumentArchive, OriginalArchive};
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::keyword::KeywordExtractor;
use crate::extraction::llm::LlmExtractor;
use crate::extraction::SkillExtractor;
use crate::llm_client::LlmClient;
use crate::matching::catalog::SkillCatalog;
use crate::matching::{SkillNormalizer, SynonymTable};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    // Synonym table: built-in groups plus optional JSON overlay
    let mut synonyms = SynonymTable::builtin();
    if let Some(path) = &config.synonyms_path {
        synonyms
            .merge_json_file(path)
            .with_context(|| format!("Failed to load synonyms from {}", path.display()))?;
        info!("Merged skill synonyms from {}", path.display());
    }
    let normalizer = Arc::new(SkillNormalizer::new(synonyms));

    // Persistence: PostgreSQL when DATABASE_URL is set, otherwise in memory
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None if config.seed_demo_data => Arc::new(MemoryStore::with_demo_data()),
        None => Arc::new(MemoryStore::new()),
    };
    info!("Store backend: {}", store.backend());

    // Extraction: LLM when an API key is configured, catalog keywords otherwise
    let extractor: Arc<dyn SkillExtractor> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmExtractor::new(llm, normalizer.clone()))
        }
        None => Arc::new(KeywordExtractor::new(
            SkillCatalog::builtin(),
            normalizer.clone(),
        )),
    };
    info!(
        "Extractor backend: {} (timeout {}s)",
        extractor.backend(),
        config.extraction_timeout_secs
    );

    // Original uploads go to S3 / MinIO when configured
    let archive: Option<Arc<dyn OriginalArchive>> = match &config.s3 {
        Some(s3) => {
            let archive = DocumentArchive::connect(s3).await;
            info!("S3 archive initialized (bucket: {})", s3.bucket);
            Some(Arc::new(archive))
        }
        None => None,
    };

    let state = AppState::new(config.clone(), store, extractor, archive, normalizer);
    state.settings.read().await.validate()?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
