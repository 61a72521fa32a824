use crate::error::{Result, SktError};
use async_trait::async_trait;
use std::error::Error as _;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LicenseCheckResult {
    Valid,
    Invalid,
    TransportError(String),
}

#[async_trait]
pub trait LicenseGate: Send + Sync {
    /// One attempt, no retry. Callers reject empty keys beforehand.
    async fn check(&self, key: &str) -> LicenseCheckResult;
}

/// Validates keys against a search endpoint that answers with a JSON array of
/// matching records.
pub struct HttpLicenseGate {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpLicenseGate {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SktError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl LicenseGate for HttpLicenseGate {
    async fn check(&self, key: &str) -> LicenseCheckResult {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("key", key)])
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let response = match response {
            Ok(r) => r,
            Err(e) => return transport_error(&e),
        };

        match response.json::<Vec<serde_json::Value>>().await {
            Ok(records) if records.is_empty() => LicenseCheckResult::Invalid,
            Ok(records) => {
                tracing::debug!(matches = records.len(), "license key matched");
                LicenseCheckResult::Valid
            }
            Err(e) => transport_error(&e),
        }
    }
}

fn transport_error(err: &reqwest::Error) -> LicenseCheckResult {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    if err.is_timeout() {
        detail = format!("request timed out: {detail}");
    }
    tracing::warn!(error = %detail, "license check failed");
    LicenseCheckResult::TransportError(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gate_for(server: &MockServer, timeout: Duration) -> HttpLicenseGate {
        HttpLicenseGate::new(
            &format!("{}/api/v1/licenses/search", server.uri()),
            "lic_test",
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn empty_array_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/licenses/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let result = gate_for(&server, Duration::from_secs(5)).check("nope").await;
        assert_eq!(result, LicenseCheckResult::Invalid);
    }

    #[tokio::test]
    async fn matching_record_is_valid_and_sends_key_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/licenses/search"))
            .and(query_param("key", "KEY-123"))
            .and(header("authorization", "Bearer lic_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "key": "KEY-123" }])))
            .expect(1)
            .mount(&server)
            .await;

        let result = gate_for(&server, Duration::from_secs(5)).check("KEY-123").await;
        assert_eq!(result, LicenseCheckResult::Valid);
    }

    #[tokio::test]
    async fn timeout_is_transport_error_with_cause() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "key": "KEY-123" }]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let result = gate_for(&server, Duration::from_millis(50)).check("KEY-123").await;
        match result {
            LicenseCheckResult::TransportError(detail) => assert!(detail.contains("timed out")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = gate_for(&server, Duration::from_secs(5)).check("KEY-123").await;
        assert!(matches!(result, LicenseCheckResult::TransportError(_)));
    }

    #[tokio::test]
    async fn server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = gate_for(&server, Duration::from_secs(5)).check("KEY-123").await;
        assert!(matches!(result, LicenseCheckResult::TransportError(_)));
    }
}
