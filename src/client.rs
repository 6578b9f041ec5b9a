//! HTTP caller for the translation and scoring capabilities.
//!
//! Both capabilities share the same wire shape: POST `{"message": text}`,
//! JSON object back. A payload carrying an `error` field, a non-2xx
//! status, or a transport failure is always surfaced as a
//! [`ServiceError`], never replaced with a default value.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ServiceError;

#[derive(Serialize)]
struct CapabilityRequest<'a> {
    message: &'a str,
}

/// Union of the translation and scoring response payloads.
#[derive(Deserialize, Default)]
struct CapabilityResponse {
    translated_message: Option<String>,
    score: Option<f64>,
    error: Option<String>,
}

/// Request/response caller for one named capability endpoint.
///
/// Calls are unbuffered: one request in flight per call. Any concurrency
/// across rows is the orchestrator's policy, not the client's.
#[derive(Clone)]
pub struct CapabilityClient {
    endpoint: String,
    http: reqwest::Client,
}

impl CapabilityClient {
    /// Create a client with a per-call timeout bounding each invocation.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ServiceError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the translation capability for the translated form of `message`.
    pub async fn translate(&self, message: &str) -> Result<String, ServiceError> {
        let payload = self.invoke(message).await?;
        payload
            .translated_message
            .ok_or_else(|| self.remote("response is missing translated_message".into()))
    }

    /// Ask the scoring capability for the toxicity score of `message`.
    pub async fn score(&self, message: &str) -> Result<f64, ServiceError> {
        let payload = self.invoke(message).await?;
        payload
            .score
            .ok_or_else(|| self.remote("response is missing score".into()))
    }

    async fn invoke(&self, message: &str) -> Result<CapabilityResponse, ServiceError> {
        debug!(endpoint = %self.endpoint, "invoking capability");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&CapabilityRequest { message })
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ServiceError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        // An error field wins regardless of status; some capabilities
        // report failures with a 200.
        let payload: CapabilityResponse = serde_json::from_str(&body).unwrap_or_default();
        if let Some(detail) = payload.error {
            return Err(self.remote(detail));
        }
        if !status.is_success() {
            return Err(self.remote(format!("status {status}: {body}")));
        }
        Ok(payload)
    }

    fn remote(&self, detail: String) -> ServiceError {
        ServiceError::Remote {
            endpoint: self.endpoint.clone(),
            detail,
        }
    }
}

impl std::fmt::Debug for CapabilityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn translate_returns_payload_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({ "message": "hola" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({ "translated_message": "hello" }),
            ))
            .mount(&server)
            .await;

        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        assert_eq!(client.translate("hola").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn score_returns_payload_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "score": 0.73 })),
            )
            .mount(&server)
            .await;

        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        let score = client.score("you fool").await.unwrap();
        assert!((score - 0.73).abs() < 1e-9);
    }

    #[tokio::test]
    async fn error_payload_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({ "error": "missing message field" }),
            ))
            .mount(&server)
            .await;

        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        let err = client.translate("hi").await.unwrap_err();
        match err {
            ServiceError::Remote { detail, .. } => {
                assert_eq!(detail, "missing message field")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn error_payload_with_200_status_is_still_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "model unavailable" })),
            )
            .mount(&server)
            .await;

        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        assert!(client.score("hi").await.is_err());
    }

    #[tokio::test]
    async fn non_2xx_without_error_field_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        let err = client.translate("hi").await.unwrap_err();
        match err {
            ServiceError::Remote { detail, .. } => assert!(detail.contains("503")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_success_field_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "score": 0.5 })),
            )
            .mount(&server)
            .await;

        // Asking for a translation from a scoring-shaped payload.
        let client = CapabilityClient::new(server.uri(), TIMEOUT).unwrap();
        let err = client.translate("hi").await.unwrap_err();
        match err {
            ServiceError::Remote { detail, .. } => {
                assert!(detail.contains("translated_message"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Port 1 is never listening.
        let client = CapabilityClient::new("http://127.0.0.1:1", TIMEOUT).unwrap();
        let err = client.translate("hi").await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport { .. }));
    }
}
