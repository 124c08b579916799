mod config;
mod drafts;
mod errors;
mod models;
mod parser;
mod routes;
mod state;
mod uploads;
mod wizard;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::drafts::{DraftStore, RedisKv};
use crate::parser::ResumeParserClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::progress::UploadRegistry;
use crate::uploads::{S3ObjectStore, UploadAdapter};
use crate::wizard::submission::LogSubmissionSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobform API v{}", env!("CARGO_PKG_VERSION"));

    // Draft store (Redis)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let drafts = DraftStore::new(Arc::new(RedisKv::new(redis)));
    info!("Redis draft store initialized");

    // Object store (S3 / MinIO)
    let s3 = build_s3_client(&config).await;
    let objects = S3ObjectStore::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_public_url.clone(),
    );
    let uploads = UploadAdapter::new(Arc::new(objects), config.upload_preset.clone());
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Resume parsing proxy
    let parser = ResumeParserClient::new(
        config.resume_parser_url.clone(),
        config.resume_parser_api_key.clone(),
    )?;
    info!("Resume parser client initialized ({})", config.resume_parser_url);

    // Build app state
    let state = AppState {
        drafts,
        uploads,
        progress: UploadRegistry::default(),
        parser,
        submissions: Arc::new(LogSubmissionSink),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the form's origin

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
        "jobform-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO only serves path-style requests.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
