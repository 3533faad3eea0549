//! Images API Client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchError, ImageGenerator};

/// Client for `POST /images/generations`.
#[derive(Clone)]
pub struct OpenAiImageClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    size: String,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiImageClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str, size: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            size: size.to_string(),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(&self, prompt: &str) -> Result<String, DispatchError> {
        let resp = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.token)
            .json(&ImageRequest {
                prompt,
                n: 1,
                size: &self.size,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(DispatchError::Generation(message));
        }

        let body: ImageResponse = resp.json().await?;
        body.data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .ok_or_else(|| DispatchError::Generation("no image returned".to_string()))
    }
}
