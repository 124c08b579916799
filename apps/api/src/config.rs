use anyhow::{Context, Result};

use crate::parser::DEFAULT_PARSER_URL;

const DEFAULT_UPLOAD_PRESET: &str = "byond_labs";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base URL resumes are served from once uploaded.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub resume_parser_url: String,
    pub resume_parser_api_key: String,
    /// Key prefix every resume upload is stored under.
    pub upload_preset: String,
    pub max_upload_bytes: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_endpoint = require_env("S3_ENDPOINT")?;
        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_public_url: std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| s3_endpoint.clone()),
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            resume_parser_url: std::env::var("RESUME_PARSER_URL")
                .unwrap_or_else(|_| DEFAULT_PARSER_URL.to_string()),
            resume_parser_api_key: require_env("RESUME_PARSER_API_KEY")?,
            upload_preset: std::env::var("UPLOAD_PRESET")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_PRESET.to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<u64>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            redis_url: "redis://127.0.0.1:6379".into(),
            s3_bucket: "resumes".into(),
            s3_endpoint: "http://127.0.0.1:9000".into(),
            s3_public_url: "http://127.0.0.1:9000".into(),
            aws_access_key_id: "test".into(),
            aws_secret_access_key: "test".into(),
            resume_parser_url: "http://127.0.0.1:9/parse".into(),
            resume_parser_api_key: "test".into(),
            upload_preset: DEFAULT_UPLOAD_PRESET.into(),
            max_upload_bytes: 64 * 1024,
            port: 0,
            rust_log: "debug".into(),
        }
    }
}
