use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, StatusCode, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, CLIENT_TIMEOUTS,
};
use crate::types::{ChatCompletion, ChatCompletionParams, Reply};

const DEFAULT_API_URL: &str = "https://api.mistral.ai/v1/";
const COMPLETIONS_PATH: &str = "chat/completions";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can turn a conversation into the assistant's next reply.
///
/// [`Mistral`] implements this over HTTP; sessions are generic over it so
/// they can be driven without network access.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Run one completion round trip.
    async fn complete(&self, params: &ChatCompletionParams) -> Result<Reply>;
}

/// Client for the Mistral chat-completions API.
#[derive(Debug, Clone)]
pub struct Mistral {
    authorization: HeaderValue,
    client: ReqwestClient,
    endpoint: Url,
    timeout: Duration,
}

impl Mistral {
    /// Create a new Mistral client for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// `base_url` is the API root (e.g. `https://api.mistral.ai/v1/`); the
    /// completions path is appended to it.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::authentication("API key is empty"));
        }
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| Error::authentication("API key contains invalid characters"))?;
        authorization.set_sensitive(true);

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let endpoint = Url::parse(&base_url)?.join(COMPLETIONS_PATH)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            authorization,
            client,
            endpoint,
            timeout,
        })
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            CLIENT_TIMEOUTS.click();
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// POST the serialized params and return the status and raw body.
    async fn post(&self, params: &ChatCompletionParams) -> Result<(StatusCode, String)> {
        let body = serde_json::to_vec(params).map_err(|e| {
            Error::serialization(
                format!("Failed to serialize request: {}", e),
                Some(Box::new(e)),
            )
        })?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok((status, text))
    }

    /// Send a conversation to the API and return the first choice.
    pub async fn send(&self, params: &ChatCompletionParams) -> Result<Reply> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        tracing::debug!(
            model = %params.model,
            messages = params.messages.len(),
            endpoint = %self.endpoint,
            "sending chat completion"
        );

        let result = match self.post(params).await {
            Ok((status, body)) if status == StatusCode::OK => ChatCompletion::parse_reply(&body),
            Ok((status, body)) => Err(Error::http_status(status.as_u16(), body)),
            Err(err) => Err(err),
        };
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(reply) => tracing::debug!(
                model = %params.model,
                reply_chars = reply.content.len(),
                "chat completion succeeded"
            ),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::warn!(model = %params.model, error = %err, "chat completion failed");
            }
        }
        result
    }
}

#[async_trait::async_trait]
impl Completion for Mistral {
    async fn complete(&self, params: &ChatCompletionParams) -> Result<Reply> {
        self.send(params).await
    }
}
