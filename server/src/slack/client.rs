//! Slack Web API Client
//!
//! Minimal `reqwest` client for the three Web API methods the bot uses:
//! `chat.postMessage`, `auth.test` and `users.conversations`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::dispatch::{DispatchError, MessageDispatcher};
use crate::mention::compose::OutboundMessage;

/// Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

/// Common envelope of every Web API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ConversationsResponse {
    #[serde(default)]
    channels: Vec<Conversation>,
}

#[derive(Debug, Deserialize)]
struct Conversation {
    id: String,
}

/// Render a message as a `chat.postMessage` body.
pub fn message_payload(channel_id: &str, message: &OutboundMessage) -> Value {
    match message {
        OutboundMessage::Acknowledgement { text } | OutboundMessage::SimpleText { text } => json!({
            "channel": channel_id,
            "text": text,
        }),
        OutboundMessage::ImageWithCaption { url, caption, .. } => json!({
            "channel": channel_id,
            "text": message.text(),
            "blocks": [
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": message.text() },
                },
                {
                    "type": "image",
                    "image_url": url,
                    "alt_text": caption,
                },
            ],
        }),
    }
}

impl SlackClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// Send a request and unwrap the `ok`/`error` envelope.
    async fn call(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, DispatchError> {
        let body: ApiResponse = request
            .bearer_auth(&self.token)
            .send()
            .await?
            .json()
            .await?;

        if !body.ok {
            let err = body.error.unwrap_or_else(|| "unknown".to_string());
            return Err(DispatchError::Slack(format!("{method} failed: {err}")));
        }
        Ok(Value::Object(body.rest))
    }

    fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, DispatchError> {
        serde_json::from_value(value)
            .map_err(|e| DispatchError::Slack(format!("{method} returned unexpected body: {e}")))
    }
}

#[async_trait]
impl MessageDispatcher for SlackClient {
    async fn post_message(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        let method = "chat.postMessage";
        let request = self
            .http
            .post(self.url(method))
            .json(&message_payload(channel_id, message));
        self.call(method, request).await?;
        Ok(())
    }

    async fn own_user_id(&self) -> Result<String, DispatchError> {
        let method = "auth.test";
        let body = self.call(method, self.http.post(self.url(method))).await?;
        let resp: AuthTestResponse = Self::decode(method, body)?;
        Ok(resp.user_id)
    }

    async fn conversations_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, DispatchError> {
        let method = "users.conversations";
        let limit = limit.to_string();
        let request = self.http.get(self.url(method)).query(&[
            ("user", user_id),
            ("exclude_archived", "true"),
            ("limit", limit.as_str()),
        ]);
        let body = self.call(method, request).await?;
        let resp: ConversationsResponse = Self::decode(method, body)?;
        Ok(resp.channels.into_iter().map(|c| c.id).collect())
    }
}
