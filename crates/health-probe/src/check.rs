//! # Health Check
//!
//! One HTTP GET, classified by status code. Only an exact `200` is healthy;
//! redirects are reported as-is rather than followed, so a `301` fails the
//! check just like a `404` or `500`.
//!
//! ## Example
//!
//! ```no_run
//! use health_probe::{HealthCheckRequest, HealthChecker};
//!
//! # async fn example() -> health_probe::Result<()> {
//! let checker = HealthChecker::new("Mozilla/5.0")?;
//! let request = HealthCheckRequest::new("https://example.com")?;
//!
//! let result = checker.check(&request).await;
//! println!("healthy: {}", result.healthy);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use reqwest::redirect::Policy;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ProbeError, Result};

/// Status code reported when no HTTP response was received.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// The URL to probe. Non-empty; otherwise unvalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckRequest {
    target_url: String,
}

impl HealthCheckRequest {
    /// Build a request from the configured target.
    ///
    /// Rejects only blank input. A malformed URL is accepted here and shows
    /// up later as a transport failure.
    pub fn new(target_url: impl Into<String>) -> Result<Self> {
        let target_url = target_url.into();
        if target_url.trim().is_empty() {
            return Err(ProbeError::Config(
                "URL to check is empty (set URL_TO_CHECK or pass --url)".to_string(),
            ));
        }
        Ok(Self { target_url })
    }

    /// Build a request from an optional configured value.
    pub fn from_optional(target_url: Option<String>) -> Result<Self> {
        match target_url {
            Some(url) => Self::new(url),
            None => Err(ProbeError::Config(
                "URL to check is not set (set URL_TO_CHECK or pass --url)".to_string(),
            )),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

/// Outcome of a single health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub url: String,
    /// HTTP status, or `0` when the request never got a response.
    pub status_code: u16,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    /// Result for a response that arrived with `status_code`.
    pub fn from_status(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code,
            healthy: is_healthy_status(status_code),
            error_message: None,
            checked_at: Utc::now(),
        }
    }

    /// Result for a request that failed before any response.
    pub fn transport_failure(url: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: TRANSPORT_FAILURE_STATUS,
            healthy: false,
            error_message: Some(error_message.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn failed(&self) -> bool {
        !self.healthy
    }
}

/// Only an exact 200 counts.
pub const fn is_healthy_status(status_code: u16) -> bool {
    status_code == 200
}

/// Issues the health check GET.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    client: reqwest::Client,
}

impl HealthChecker {
    /// Client with the given user agent. No retry, no timeout override, no
    /// redirect following.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client })
    }

    /// Probe the target once. Never fails: transport errors become a
    /// status-0 result.
    pub async fn check(&self, request: &HealthCheckRequest) -> HealthCheckResult {
        let url = request.target_url();
        debug!(url, "Sending health check request");

        match self.client.get(url).send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let result = HealthCheckResult::from_status(url, status_code);
                info!(url, status_code, healthy = result.healthy, "Health check completed");
                result
            }
            Err(e) => {
                let message = describe_transport_error(&e);
                warn!(url, error = %message, "Health check request failed");
                HealthCheckResult::transport_failure(url, message)
            }
        }
    }
}

/// reqwest's top-level message ("error sending request") hides the cause;
/// append the source chain.
fn describe_transport_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_returning(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    fn checker() -> HealthChecker {
        HealthChecker::new("Mozilla/5.0").unwrap()
    }

    #[test]
    fn test_only_200_is_healthy() {
        assert!(is_healthy_status(200));
        for code in [0, 100, 201, 204, 299, 301, 302, 304, 400, 404, 500, 503] {
            assert!(!is_healthy_status(code), "{code} must be unhealthy");
        }
    }

    #[test]
    fn test_transport_failure_result() {
        let result = HealthCheckResult::transport_failure("https://nope.invalid", "dns error");
        assert_eq!(result.status_code, 0);
        assert!(!result.healthy);
        assert!(result.failed());
        assert_eq!(result.error_message.as_deref(), Some("dns error"));
    }

    #[test]
    fn test_request_rejects_blank_url() {
        assert!(matches!(
            HealthCheckRequest::new(""),
            Err(ProbeError::Config(_))
        ));
        assert!(matches!(
            HealthCheckRequest::new("   "),
            Err(ProbeError::Config(_))
        ));
        assert!(matches!(
            HealthCheckRequest::from_optional(None),
            Err(ProbeError::Config(_))
        ));
    }

    #[test]
    fn test_request_accepts_malformed_url() {
        let request = HealthCheckRequest::new("not a url").unwrap();
        assert_eq!(request.target_url(), "not a url");
    }

    #[tokio::test]
    async fn test_check_200_is_healthy() {
        let server = server_returning(200).await;
        let request = HealthCheckRequest::new(server.uri()).unwrap();

        let result = checker().check(&request).await;

        assert_eq!(result.status_code, 200);
        assert!(result.healthy);
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_check_404_is_unhealthy() {
        let server = server_returning(404).await;
        let request = HealthCheckRequest::new(server.uri()).unwrap();

        let result = checker().check(&request).await;

        assert_eq!(result.status_code, 404);
        assert!(!result.healthy);
    }

    #[tokio::test]
    async fn test_check_does_not_follow_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/home"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/home"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let request = HealthCheckRequest::new(server.uri()).unwrap();

        let result = checker().check(&request).await;

        assert_eq!(result.status_code, 301);
        assert!(!result.healthy);
    }

    #[tokio::test]
    async fn test_check_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "probe-test/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let request = HealthCheckRequest::new(server.uri()).unwrap();

        let result = HealthChecker::new("probe-test/1.0")
            .unwrap()
            .check(&request)
            .await;

        assert!(result.healthy);
    }

    #[tokio::test]
    async fn test_check_malformed_url_is_transport_failure() {
        let request = HealthCheckRequest::new("not a url").unwrap();

        let result = checker().check(&request).await;

        assert_eq!(result.status_code, TRANSPORT_FAILURE_STATUS);
        assert!(!result.healthy);
        assert!(!result.error_message.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_check_is_stable_across_runs() {
        let server = server_returning(503).await;
        let request = HealthCheckRequest::new(server.uri()).unwrap();
        let checker = checker();

        let first = checker.check(&request).await;
        let second = checker.check(&request).await;

        assert_eq!(first.healthy, second.healthy);
        assert_eq!(first.status_code, second.status_code);
    }
}
