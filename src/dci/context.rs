use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::auth::Credentials;
use crate::error::{DciError, Result};

use super::resources::Resource;
use super::response::ApiResponse;

pub const DEFAULT_BASE_URL: &str = "https://api.distributed-ci.io";
const USER_AGENT: &str = concat!("dcilens/", env!("CARGO_PKG_VERSION"));

/// Everything needed to open a [`Context`] against a DCI control server.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Authenticated session against the DCI API.
///
/// Cheap to build; services open one per call and drop it on return.
pub struct Context {
    client: Client,
    api_url: Url,
    credentials: Option<Credentials>,
    max_retries: u32,
    retry_delay: Duration,
}

impl Context {
    /// Opens a context from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DciError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base = Url::parse(&settings.base_url)
            .map_err(|e| DciError::Config(format!("Invalid base URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(DciError::Config(format!(
                "Base URL cannot hold a path: {}",
                settings.base_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let api_url = base
            .join("api/v1/")
            .map_err(|e| DciError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            credentials: settings.credentials.clone(),
            max_retries: settings.max_retries,
            retry_delay: settings.retry_delay,
        })
    }

    /// Builds `{api}/v1/{segments...}`, escaping each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // api_url always has a path (checked in `new`)
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        }
    }

    /// Issues a GET with automatic retry on network errors, rate limits and
    /// server errors.
    ///
    /// `resource` and `id` only label a not-found error.
    pub(crate) async fn get(
        &self,
        url: Url,
        query: &[(&str, String)],
        resource: Resource,
        id: &str,
    ) -> Result<ApiResponse> {
        let mut retry_count = 0;
        loop {
            debug!("GET {url}");
            let request = self.auth_request(self.client.get(url.clone()).query(query));

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                    if retry_count >= self.max_retries {
                        return Err(e.into());
                    }
                    warn!(
                        "Network error ({}), retrying in {:?} ({}/{})...",
                        e,
                        self.retry_delay,
                        retry_count + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if retry_count >= self.max_retries {
                    return Err(DciError::ApiErrorAfterRetries {
                        status: status.as_u16(),
                        retries: self.max_retries,
                    });
                }

                warn!(
                    "DCI API error (status {status}). Waiting {:?} before retry {}/{}...",
                    self.retry_delay,
                    retry_count + 1,
                    self.max_retries
                );

                tokio::time::sleep(self.retry_delay).await;
                retry_count += 1;
                continue;
            }

            match status {
                StatusCode::NOT_FOUND => {
                    return Err(DciError::NotFound {
                        resource: resource.to_string(),
                        id: id.to_string(),
                    })
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    return Err(DciError::Unauthorized {
                        status: status.as_u16(),
                    })
                }
                _ => {}
            }

            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                return Err(DciError::Api {
                    status: status.as_u16(),
                    message: error_text,
                });
            }

            let body = response.bytes().await?.to_vec();
            return Ok(ApiResponse::Http { status, body });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> ConnectionSettings {
        ConnectionSettings {
            base_url: base_url.to_string(),
            ..ConnectionSettings::default()
        }
    }

    #[test]
    fn test_api_url_from_bare_host() {
        let ctx = Context::new(&settings("https://api.distributed-ci.io")).unwrap();
        assert_eq!(
            ctx.endpoint(&["pipelines"]).as_str(),
            "https://api.distributed-ci.io/api/v1/pipelines"
        );
    }

    #[test]
    fn test_api_url_keeps_base_path() {
        let ctx = Context::new(&settings("https://dci.example.com/control")).unwrap();
        assert_eq!(
            ctx.endpoint(&["teams"]).as_str(),
            "https://dci.example.com/control/api/v1/teams"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Context::new(&settings("not a url"));
        assert!(matches!(result, Err(DciError::Config(_))));
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let ctx = Context::new(&settings("https://api.distributed-ci.io")).unwrap();
        assert_eq!(
            ctx.endpoint(&["pipelines", "a b/c", "jobs"]).as_str(),
            "https://api.distributed-ci.io/api/v1/pipelines/a%20b%2Fc/jobs"
        );
    }
}
