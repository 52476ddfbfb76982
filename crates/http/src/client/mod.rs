//! Console API client
//!
//! Every request passes through two interception stages: an outbound stage
//! that attaches the credential header and defaults the content type, and
//! an inbound stage that turns whatever came back into one normalized
//! outcome. Both auth-failure triggers (an embedded envelope code and a raw
//! HTTP 401) converge on the same teardown routine.

pub mod error;

use crate::types::{ApiEnvelope, ErrorBody};
use bytes::Bytes;
use error::{ClientError, FailureKind, SYSTEM_ERROR_MESSAGE};
use portico_core::routes;
use portico_core::{Navigator, Notifier, SessionSink, TokenSource};
use reqwest::{Client, ClientBuilder, Method, Request, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Request timeout applied to every call
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_USER_AGENT: &str = concat!("portico-client/", env!("CARGO_PKG_VERSION"));

/// Console API client
#[derive(Clone)]
pub struct ConsoleClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    sessions: Arc<dyn SessionSink>,
}

impl ConsoleClient {
    /// Create a new client builder
    pub fn builder() -> ConsoleClientBuilder {
        ConsoleClientBuilder::new()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for an API path
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http.request(method, url)
    }

    /// Execute a request whose response body is a business envelope
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(request).await?;
        let envelope = match response.json::<ApiEnvelope>().await {
            Ok(envelope) => envelope,
            // A 2xx body that is not an envelope takes the same path as
            // any non-success code.
            Err(err) => {
                debug!(error = %err, "response body is not a business envelope");
                ApiEnvelope {
                    code: 0,
                    msg: String::new(),
                    data: Value::Null,
                }
            }
        };
        let data = self.classify(envelope).await?;
        serde_json::from_value(data).map_err(ClientError::from)
    }

    /// Execute a binary or stream fetch
    ///
    /// The raw body is returned as-is; no envelope inspection happens on
    /// this path.
    pub async fn execute_bytes(&self, request: RequestBuilder) -> Result<Bytes, ClientError> {
        let response = self.dispatch(request).await?;
        match response.bytes().await {
            Ok(body) => Ok(body),
            Err(err) => Err(self.network_failure(err)),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    /// Fire a POST whose payload is irrelevant; the envelope is still
    /// classified
    pub async fn post_unit(&self, path: &str) -> Result<(), ClientError> {
        let _: Value = self.execute(self.request(Method::POST, path)).await?;
        Ok(())
    }

    /// Fetch a binary resource (file streams, exports)
    pub async fn download(&self, path: &str) -> Result<Bytes, ClientError> {
        self.execute_bytes(self.request(Method::GET, path)).await
    }

    /// Outbound stage, transmission, and transport-level classification
    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let mut request = request
            .build()
            .map_err(|err| ClientError::Configuration(err.to_string()))?;
        self.outbound(&mut request);
        debug!(method = %request.method(), url = %request.url(), "dispatching request");
        match self.http.execute(request).await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => Err(self.status_failure(response).await),
            Err(err) => Err(self.network_failure(err)),
        }
    }

    /// Outbound interception: credential header and content-type default
    fn outbound(&self, request: &mut Request) {
        if let Some(token) = self.tokens.token() {
            match header::HeaderValue::from_str(&token) {
                Ok(value) => {
                    request.headers_mut().insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("token is not a valid header value, sending without it"),
            }
        }
        // Multipart and other framed bodies already negotiated their own
        // content type and are left untouched.
        if request.body().is_some() && !request.headers().contains_key(header::CONTENT_TYPE) {
            request.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
        }
    }

    /// Inbound classification of a parsed envelope
    async fn classify(&self, envelope: ApiEnvelope) -> Result<Value, ClientError> {
        if envelope.is_success() {
            return Ok(envelope.data);
        }
        let auth_expired = envelope.is_auth_expired();
        let message = if envelope.msg.is_empty() {
            SYSTEM_ERROR_MESSAGE.to_string()
        } else {
            envelope.msg
        };
        if auth_expired {
            self.handle_auth_failure(&message).await;
        } else {
            self.notifier.notify(&message);
        }
        Err(ClientError::business(message))
    }

    /// Classify a response whose HTTP status was outside the 2xx range
    async fn status_failure(&self, response: Response) -> ClientError {
        let status = response.status();
        let kind = FailureKind::from_status(status);
        let message = match kind {
            FailureKind::Unauthenticated => kind.default_message().to_string(),
            _ => response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| kind.default_message().to_string()),
        };
        warn!(status = status.as_u16(), %kind, %message, "request rejected");
        if kind == FailureKind::Unauthenticated {
            self.handle_auth_failure(&message).await;
        } else {
            self.notifier.notify(&message);
        }
        ClientError::transport(kind, message)
    }

    /// Classify a request that produced no response at all
    fn network_failure(&self, err: reqwest::Error) -> ClientError {
        warn!(error = %err, "request failed without a response");
        self.notifier.notify(SYSTEM_ERROR_MESSAGE);
        ClientError::transport(FailureKind::Unknown, SYSTEM_ERROR_MESSAGE)
    }

    /// Shared teardown for both auth-failure triggers
    ///
    /// Local teardown only: the session and its durable mirror are
    /// cleared and navigation goes to the login page. The backend logout
    /// endpoint is not called from here, so an auth failure during logout
    /// cannot re-enter the pipeline.
    async fn handle_auth_failure(&self, message: &str) {
        self.notifier.notify(message);
        self.sessions.clear_session().await;
        self.navigator.push(routes::LOGIN_PATH);
    }
}

/// Builder for [`ConsoleClient`]
pub struct ConsoleClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
    sessions: Option<Arc<dyn SessionSink>>,
}

impl ConsoleClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            tokens: None,
            notifier: None,
            navigator: None,
            sessions: None,
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Source of the current credential
    pub fn token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// User-facing message display
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Route change handler
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Session invalidation hook
    pub fn session_sink(mut self, sessions: Arc<dyn SessionSink>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ConsoleClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let tokens = self
            .tokens
            .ok_or_else(|| ClientError::Configuration("token source is required".into()))?;
        let notifier = self
            .notifier
            .ok_or_else(|| ClientError::Configuration("notifier is required".into()))?;
        let navigator = self
            .navigator
            .ok_or_else(|| ClientError::Configuration("navigator is required".into()))?;
        let sessions = self
            .sessions
            .ok_or_else(|| ClientError::Configuration("session sink is required".into()))?;

        let mut client_builder = ClientBuilder::new().user_agent(
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.timeout(self.timeout);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        let http = client_builder
            .build()
            .map_err(|err| ClientError::Configuration(err.to_string()))?;

        Ok(ConsoleClient {
            http,
            base_url,
            tokens,
            notifier,
            navigator,
            sessions,
        })
    }
}

impl Default for ConsoleClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
