mod analysis;
mod auth;
mod coaching;
mod config;
mod db;
mod errors;
mod events;
mod extract;
mod llm_client;
mod models;
mod nlp_client;
mod routes;
mod state;
mod storage;
mod store;
mod venture;

#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::auth::IdentityToolkitVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::events::RedisEventPublisher;
use crate::llm_client::PredictionClient;
use crate::nlp_client::LanguageApiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3Archive;
use crate::store::PgResultStore;

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

    info!("Starting Pitchcraft API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Redis pub/sub for analysis events
    let redis = redis::Client::open(config.redis_url.clone())?;
    let events = RedisEventPublisher::connect(&redis, config.events_channel.clone()).await?;
    info!("Redis connection established (channel: {})", config.events_channel);

    // S3 / MinIO archive for uploaded resumes
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let nlp = LanguageApiClient::new(&config.nlp_endpoint, &config.nlp_api_key)?;
    let llm = PredictionClient::new(
        &config.prediction_endpoint,
        &config.prediction_access_token,
        config.prediction,
    )?;
    let verifier =
        IdentityToolkitVerifier::new(&config.identity_endpoint, &config.identity_api_key)?;
    info!("NLP, prediction and identity clients initialized");

    let state = AppState {
        nlp: Arc::new(nlp),
        llm: Arc::new(llm),
        store: Arc::new(PgResultStore::new(db)),
        archive: Arc::new(S3Archive::new(s3, config.s3_bucket.clone())),
        events: Arc::new(events),
        verifier: Arc::new(verifier),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "pitchcraft-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
