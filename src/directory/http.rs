//! HTTP directory client
//!
//! Fetches principal profiles from `GET {endpoint}/principals/{id}`.

use crate::access_control::PrincipalProfile;
use crate::config::{DirectoryConfig, MAX_DIRECTORY_RETRIES};
use crate::directory::provider::DirectoryProvider;
use crate::error::{DirectoryError, DirectoryResult};
use crate::util::SecretString;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Directory service client
pub struct HttpDirectory {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
    max_retries: u32,
}

impl HttpDirectory {
    /// Create a client for `base_url` using connection settings from `config`
    pub fn new(base_url: &str, config: &DirectoryConfig) -> DirectoryResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("content-guard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DirectoryError::Request)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            max_retries: config.max_retries.min(MAX_DIRECTORY_RETRIES),
        })
    }

    fn profile_url(&self, principal_id: &str) -> String {
        format!(
            "{}/principals/{}",
            self.base_url,
            urlencoding::encode(principal_id)
        )
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Execute a request with retries on connection errors and 5xx responses
    async fn execute(&self, request: RequestBuilder, principal_id: &str) -> DirectoryResult<Response> {
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(attempt)).await;
                debug!("Retrying directory request (attempt {})", attempt + 1);
            }

            let req = request.try_clone().ok_or_else(|| {
                DirectoryError::InvalidResponse("Cannot clone request".to_string())
            })?;

            let result = match req.send().await {
                Ok(response) => Self::check_status(response, principal_id).await,
                Err(e) => Err(DirectoryError::Request(e)),
            };

            match result {
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    warn!(error = %e, "Directory request failed");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn check_status(response: Response, principal_id: &str) -> DirectoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DirectoryError::from_response(
            status.as_u16(),
            principal_id,
            &body,
        ))
    }
}

#[async_trait]
impl DirectoryProvider for HttpDirectory {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_profile(&self, principal_id: &str) -> DirectoryResult<PrincipalProfile> {
        let request = self.authenticate(self.http.get(self.profile_url(principal_id)));
        let response = self.execute(request, principal_id).await?;

        let mut profile: PrincipalProfile = response.json().await.map_err(|e| {
            DirectoryError::InvalidResponse(format!("Failed to parse profile: {}", e))
        })?;

        if profile.id.is_empty() {
            profile.id = principal_id.to_string();
        }
        Ok(profile)
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}

/// Exponential backoff before retry `attempt` (1-based): 100ms, 200ms, 400ms...
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(100u64.saturating_mul(factor))
}

fn is_retryable(error: &DirectoryError) -> bool {
    match error {
        DirectoryError::Request(e) => e.is_timeout() || e.is_connect(),
        DirectoryError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}
