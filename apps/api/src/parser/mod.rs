//! Resume parsing proxy. Forwards an uploaded document to the parsing service
//! and hands its JSON back untouched.
//!
//! The bearer credential never leaves the server, and neither do upstream
//! error details: callers only ever see a generic failure.

use bytes::Bytes;
use reqwest::{multipart, Client};
use thiserror::Error;
use tracing::debug;

pub mod handlers;

pub const DEFAULT_PARSER_URL: &str = "https://api.affinda.com/v2/documents";
pub const DEFAULT_FILE_NAME: &str = "resume.pdf";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Clone)]
pub struct ResumeParserClient {
    client: Client,
    url: String,
    api_key: String,
}

impl ResumeParserClient {
    pub fn new(url: String, api_key: String) -> Result<Self, ParserError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            url,
            api_key,
        })
    }

    /// Sends `body` as multipart `file` plus `wait=true` so the service answers
    /// with the parsed document instead of a job handle.
    pub async fn parse(
        &self,
        file_name: &str,
        body: Bytes,
    ) -> Result<serde_json::Value, ParserError> {
        let part = multipart::Part::bytes(body.to_vec()).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("wait", "true");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ParserError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: serde_json::Value = response.json().await?;
        debug!("Parsed resume '{file_name}'");
        Ok(parsed)
    }
}
