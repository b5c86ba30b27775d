use std::{fmt, sync::Arc, time::Duration};

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use crate::{
    decode::{decode_success, is_transient_server_status, parse_retry_after, status_error},
    AgilePlaceError, ApiRequest, ApiResponse, ClientConfig, ClientOptions, Query, RateLimitInfo,
    Result, Sleeper, TokioSleeper,
};

#[derive(Clone)]
/// HTTP client for the AgilePlace REST API.
///
/// Cloning is cheap; clones share the connection pool and configuration and
/// can be used from concurrent tasks.
pub struct AgilePlaceClient {
    http: reqwest::Client,
    config: ClientConfig,
    options: ClientOptions,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for AgilePlaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgilePlaceClient")
            .field("base_url", &self.config.base_url())
            .field("token", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

/// What to do after one attempt.
#[derive(Debug)]
enum Step {
    Done(Result<JsonValue>),
    Retry(Duration),
}

impl AgilePlaceClient {
    /// Creates a client for the configured origin.
    ///
    /// Every request carries `Authorization: Bearer <token>` and
    /// `Accept: application/json`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&config.authorization()).map_err(|_| {
            AgilePlaceError::Config(
                "API token contains characters that are not allowed in an HTTP header".to_owned(),
            )
        })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("agileplace-http/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| AgilePlaceError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            options: ClientOptions::default(),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Creates a client from a tenant domain such as `mycompany.leankit.com`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agileplace_http::AgilePlaceClient;
    ///
    /// let client = AgilePlaceClient::from_domain("mycompany.leankit.com", "my-token").unwrap();
    /// ```
    pub fn from_domain(domain: impl AsRef<str>, token: impl AsRef<str>) -> Result<Self> {
        Self::new(ClientConfig::from_domain(domain, token)?)
    }

    /// Creates a client from `AGILEPLACE_DOMAIN` and `AGILEPLACE_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the timer used for backoff between retries.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends a request, retrying rate-limited responses and transport failures.
    pub async fn request(&self, request: ApiRequest) -> Result<JsonValue> {
        self.request_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`AgilePlaceClient::request`], but gives up with
    /// [`AgilePlaceError::Cancelled`] as soon as `cancel` fires, whether the
    /// request is in flight or waiting out a backoff.
    pub async fn request_with_cancel(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<JsonValue> {
        let url = self.endpoint_url(&request.path);
        let query = request.query.to_pairs();
        let mut attempt = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(AgilePlaceError::Cancelled);
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                "sending request"
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AgilePlaceError::Cancelled),
                outcome = self.send_once(&url, &request, &query) => outcome,
            };

            let delay = match self.next_step(outcome, attempt) {
                Step::Done(result) => return result,
                Step::Retry(delay) => delay,
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                max_attempts = self.options.max_retries + 1,
                delay_ms = delay.as_millis() as u64,
                "retrying request"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AgilePlaceError::Cancelled),
                _ = self.sleeper.sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    /// Sends a GET request with query parameters.
    pub async fn get(&self, path: &str, query: impl Into<Query>) -> Result<JsonValue> {
        self.request(ApiRequest::get(path).with_query(query)).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonValue> {
        self.request(ApiRequest::post(path).with_json(body)?).await
    }

    /// Sends a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> Result<JsonValue> {
        self.request(ApiRequest::post(path)).await
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonValue> {
        self.request(ApiRequest::patch(path).with_json(body)?).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonValue> {
        self.request(ApiRequest::put(path).with_json(body)?).await
    }

    /// Sends a PUT request without a body.
    pub async fn put_empty(&self, path: &str) -> Result<JsonValue> {
        self.request(ApiRequest::put(path)).await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<JsonValue> {
        self.request(ApiRequest::delete(path)).await
    }

    /// Sends a DELETE request with a JSON body.
    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<JsonValue> {
        self.request(ApiRequest::delete(path).with_json(body)?)
            .await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url(),
            path.trim().trim_start_matches('/')
        )
    }

    async fn send_once(
        &self,
        url: &str,
        request: &ApiRequest,
        query: &[(String, String)],
    ) -> std::result::Result<ApiResponse, reqwest::Error> {
        let mut builder = self
            .http
            .request(request.method.into(), url)
            .timeout(self.options.timeout());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = &request.body {
            // Sets `Content-Type: application/json`.
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    fn next_step(
        &self,
        outcome: std::result::Result<ApiResponse, reqwest::Error>,
        attempt: usize,
    ) -> Step {
        let attempts = attempt + 1;
        let can_retry = attempt < self.options.max_retries;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                if can_retry && Self::should_retry_transport(&err) {
                    return Step::Retry(self.options.backoff_delay(attempt));
                }
                return Step::Done(Err(AgilePlaceError::Transport {
                    attempts,
                    source: err,
                }));
            }
        };

        let rate_limit = RateLimitInfo::from_headers(&response.headers);
        #[cfg(feature = "tracing")]
        if let Some(remaining) = rate_limit.remaining {
            tracing::debug!(
                remaining,
                limit = rate_limit.limit,
                "rate limit quota"
            );
        }

        match response.status {
            200..=299 => Step::Done(decode_success(&response.body)),
            429 => {
                if !can_retry {
                    return Step::Done(Err(AgilePlaceError::RateLimitExceeded {
                        status: response.status,
                        attempts,
                        rate_limit,
                    }));
                }
                let delay = rate_limit
                    .retry_after
                    .as_deref()
                    .and_then(|value| parse_retry_after(value, self.options.retry_after_cap()))
                    .unwrap_or_else(|| self.options.backoff_delay(attempt));
                Step::Retry(delay)
            }
            status
                if can_retry
                    && self.options.retry_server_errors
                    && is_transient_server_status(status) =>
            {
                Step::Retry(self.options.backoff_delay(attempt))
            }
            status => Step::Done(Err(status_error(status, &response.body))),
        }
    }

    fn should_retry_transport(err: &reqwest::Error) -> bool {
        !err.is_builder() && !err.is_redirect()
    }
}
