mod agents;
mod config;
mod db;
mod errors;
mod geo;
mod insights;
mod llm_client;
mod models;
mod properties;
mod registration;
mod routes;
mod state;
mod storage;
mod uploads;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::geo::NominatimGeocoder;
use crate::insights::RedisCityInsightCache;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ObjectStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Estate API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (migrations run on connect)
    let db = create_pool(&config.database_url).await?;

    // Redis backs the city investment cache
    let redis = redis::Client::open(config.redis_url.clone())?;
    let city_cache = Arc::new(RedisCityInsightCache::new(redis));
    info!("Redis client initialized");

    let s3 = build_s3_client(&config).await;
    let storage = ObjectStorage::new(s3, config.s3_bucket.clone(), config.s3_public_url.clone());
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(config.groq_api_key.clone())?;
    if config.groq_api_key.is_some() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GROQ_API_KEY not set; AI content generation is disabled");
    }

    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.clone(),
        config.geocoder_user_agent.clone(),
    )?;

    let state = AppState {
        db,
        storage,
        llm: Arc::new(llm),
        geocoder: Arc::new(geocoder),
        city_cache,
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

/// S3 client for MinIO locally or AWS in production.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "estate-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::from_conf(
        aws_sdk_s3::config::Builder::from(&s3_config)
            .force_path_style(true)
            .build(),
    )
}
