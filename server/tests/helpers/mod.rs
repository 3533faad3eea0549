//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router with recording fakes in place of Slack and OpenAI, plus request
//! signing and polling utilities.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] to stand up an in-process HTTP server, e.g. a
//! fake Slack Web API for exercising the real outbound clients.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use imagine_server::api::{create_router, AppState};
use imagine_server::config::Config;
use imagine_server::dispatch::{DispatchError, ImageGenerator, MessageDispatcher};
use imagine_server::events::signing::{sign_request, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use imagine_server::mention::compose::OutboundMessage;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// ============================================================================
// Fakes
// ============================================================================

/// Message dispatcher that records every successful post.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(String, OutboundMessage)>>,
    /// Conversations returned for the bot identity.
    pub channels: Vec<String>,
    /// Channel whose posts fail.
    pub failing_channel: Option<String>,
    attempts: AtomicUsize,
}

impl RecordingDispatcher {
    pub fn with_channels(channels: &[&str]) -> Self {
        Self {
            channels: channels.iter().map(|c| (*c).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_channels(&self) -> Vec<String> {
        self.sent().into_iter().map(|(c, _)| c).collect()
    }

    /// Number of `post_message` calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageDispatcher for RecordingDispatcher {
    async fn post_message(
        &self,
        channel_id: &str,
        message: &OutboundMessage,
    ) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing_channel.as_deref() == Some(channel_id) {
            return Err(DispatchError::Slack("channel_not_found".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), message.clone()));
        Ok(())
    }

    async fn own_user_id(&self) -> Result<String, DispatchError> {
        Ok("UBOT".to_string())
    }

    async fn conversations_for_user(
        &self,
        _user_id: &str,
        limit: u32,
    ) -> Result<Vec<String>, DispatchError> {
        Ok(self.channels.iter().take(limit as usize).cloned().collect())
    }
}

/// Image generator returning a fixed result and recording prompts.
pub struct FakeGenerator {
    result: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn ok(url: &str) -> Self {
        Self {
            result: Ok(url.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DispatchError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone().map_err(DispatchError::Generation)
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub generator: Arc<FakeGenerator>,
}

impl TestApp {
    /// Create a test app with an empty workspace and a succeeding generator.
    pub fn new() -> Self {
        Self::with_fakes(
            RecordingDispatcher::default(),
            FakeGenerator::ok("https://images.example/generated.png"),
        )
    }

    /// Create a test app around the given fakes.
    pub fn with_fakes(dispatcher: RecordingDispatcher, generator: FakeGenerator) -> Self {
        Self::with_config(Config::default_for_test(), dispatcher, generator)
    }

    /// Create a test app with a custom configuration.
    pub fn with_config(
        config: Config,
        dispatcher: RecordingDispatcher,
        generator: FakeGenerator,
    ) -> Self {
        let dispatcher = Arc::new(dispatcher);
        let generator = Arc::new(generator);

        let state = AppState::new(config.clone(), dispatcher.clone(), generator.clone());
        let router = create_router(state);

        Self {
            router,
            config: Arc::new(config),
            dispatcher,
            generator,
        }
    }

    /// Build a request to the given URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Build an `/event-listener` request signed with the app's secret.
    pub fn signed_event(&self, body: &str) -> Request<Body> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_request(
            &self.config.slack_signing_secret,
            &timestamp,
            body.as_bytes(),
        );
        Self::request(Method::POST, "/event-listener")
            .header("Content-Type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Build a form-encoded `/send-to-channels` request from the given peer.
    pub fn broadcast_request(method: Method, peer: SocketAddr, form: &str) -> Request<Body> {
        let mut req = Self::request(method, "/send-to-channels")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        req
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

/// Read a response body into a string.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Poll `condition` every 10ms for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// ============================================================================
// Test Server
// ============================================================================

/// A running test server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}
