//! reqwest-backed verification client.
//!
//! Sends `POST {endpoint}` with `{"text": ...}` and returns the parsed body
//! as the success payload. A timeout is always set: the service itself makes
//! no promise about how long it may take.

use async_trait::async_trait;
use tracing::{debug, warn};

use claimcheck_contracts::{
    config::ServiceConfig,
    error::{ClaimcheckError, ClaimcheckResult},
    outcome::VerificationReport,
    request::VerificationRequest,
};
use claimcheck_core::traits::VerificationService;

use crate::schema::response_schema;

/// Client for the claim verification endpoint.
pub struct HttpVerificationClient {
    /// HTTP client (reusable connection pool).
    http: reqwest::Client,
    endpoint: String,
    validator: jsonschema::Validator,
}

impl HttpVerificationClient {
    /// Build a client from the `[service]` configuration section.
    pub fn new(config: &ServiceConfig) -> ClaimcheckResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ClaimcheckError::Config {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let validator =
            jsonschema::validator_for(&response_schema()).map_err(|e| ClaimcheckError::Config {
                reason: format!("invalid response schema: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim().to_string(),
            validator,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse and validate a response body.
    ///
    /// All schema violations are collected so the failure message lists every
    /// problem at once.
    pub fn parse_report(&self, body: &str) -> ClaimcheckResult<VerificationReport> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| ClaimcheckError::ResponseFormat {
                reason: format!("body is not valid JSON: {e}"),
            })?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|error| format!("{error} at '{}'", error.instance_path))
            .collect();
        if !violations.is_empty() {
            return Err(ClaimcheckError::ResponseFormat {
                reason: violations.join("; "),
            });
        }

        let report: VerificationReport =
            serde_json::from_value(value).map_err(|e| ClaimcheckError::ResponseFormat {
                reason: e.to_string(),
            })?;
        if !report.has_known_verdict() {
            debug!(verdict = %report.verdict, "service returned an unrecognised verdict");
        }
        Ok(report)
    }
}

#[async_trait]
impl VerificationService for HttpVerificationClient {
    async fn verify(&self, request: &VerificationRequest) -> ClaimcheckResult<VerificationReport> {
        debug!(endpoint = %self.endpoint, chars = request.text().len(), "posting claim");

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "verification service returned an error status");
            return Err(ClaimcheckError::Transport {
                reason: format!("HTTP status {status}"),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        self.parse_report(&body)
    }
}

fn transport_error(e: reqwest::Error) -> ClaimcheckError {
    let reason = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    ClaimcheckError::Transport { reason }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    /// Serve `router` on an ephemeral port and return the `/verify` URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/verify")
    }

    fn client_for(endpoint: String, timeout_secs: u64) -> HttpVerificationClient {
        HttpVerificationClient::new(&ServiceConfig {
            endpoint,
            timeout_secs,
            connect_timeout_secs: 1,
        })
        .unwrap()
    }

    fn request(text: &str) -> VerificationRequest {
        VerificationRequest::new(text).unwrap()
    }

    #[tokio::test]
    async fn posts_json_text_and_returns_body_verbatim() {
        let router = Router::new().route(
            "/verify",
            post(|Json(body): Json<Value>| async move {
                // The Json extractor rejects anything that is not application/json.
                assert_eq!(body, json!({ "text": "The Earth is flat" }));
                Json(json!({
                    "id": "a1b2c3d4e5f6",
                    "verdict": "False",
                    "summary": "Contradicted by evidence",
                    "links": [{ "title": "NASA", "url": "https://nasa.gov" }]
                }))
            }),
        );
        let client = client_for(serve(router).await, 5);

        let report = client.verify(&request("  The Earth is flat  ")).await.unwrap();
        assert_eq!(report.id.as_deref(), Some("a1b2c3d4e5f6"));
        assert_eq!(report.verdict, "False");
        assert_eq!(report.summary, "Contradicted by evidence");
        assert_eq!(report.links.len(), 1);
        assert_eq!(report.links[0].label(), "NASA");
    }

    #[tokio::test]
    async fn server_error_status_is_a_transport_error() {
        let router = Router::new().route(
            "/verify",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(serve(router).await, 5);

        let err = client.verify(&request("claim")).await.unwrap_err();
        match err {
            ClaimcheckError::Transport { reason } => assert!(reason.contains("500"), "{reason}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_format_error() {
        let router = Router::new().route("/verify", post(|| async { "<html>oops</html>" }));
        let client = client_for(serve(router).await, 5);

        let err = client.verify(&request("claim")).await.unwrap_err();
        assert!(matches!(err, ClaimcheckError::ResponseFormat { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_service_reports_connection_failure() {
        // Bind and immediately release a port so nothing is listening on it.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}/verify"), 5);
        let err = client.verify(&request("claim")).await.unwrap_err();
        match err {
            ClaimcheckError::Transport { reason } => {
                assert!(reason.contains("connection failed"), "{reason}")
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hung_service_is_cut_off_by_the_timeout() {
        let router = Router::new().route(
            "/verify",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "too late"
            }),
        );
        let client = client_for(serve(router).await, 1);

        let err = client.verify(&request("claim")).await.unwrap_err();
        match err {
            ClaimcheckError::Transport { reason } => assert!(reason.contains("timed out"), "{reason}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_listed_in_the_format_error() {
        let client = client_for("http://localhost:8000/verify".to_string(), 5);
        let err = client
            .parse_report(r#"{ "summary": "no verdict", "links": "none" }"#)
            .unwrap_err();
        match err {
            ClaimcheckError::ResponseFormat { reason } => {
                assert!(reason.contains("verdict"), "{reason}");
                assert!(reason.contains("/links"), "{reason}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn untitled_and_null_titled_links_are_accepted() {
        let client = client_for("http://localhost:8000/verify".to_string(), 5);
        let report = client
            .parse_report(
                r#"{
                    "verdict": "Unclear",
                    "summary": "Insufficient sources",
                    "links": [{ "url": "https://who.int" }, { "title": null, "url": "https://cdc.gov" }]
                }"#,
            )
            .unwrap();
        assert_eq!(report.links[0].label(), "https://who.int");
        assert_eq!(report.links[1].label(), "https://cdc.gov");
    }

    #[test]
    fn unknown_body_fields_are_kept_in_the_report() {
        let client = client_for("http://localhost:8000/verify".to_string(), 5);
        let body = json!({
            "verdict": "Misleading",
            "summary": "Partly accurate",
            "links": [],
            "confidence": 0.72,
            "sources_checked": ["nasa.gov", "esa.int"]
        });
        let report = client.parse_report(&body.to_string()).unwrap();
        assert_eq!(report.extra.get("confidence"), Some(&json!(0.72)));
        assert_eq!(report.extra.len(), 2);

        // The relay's success payload carries the body unchanged.
        assert_eq!(serde_json::to_value(&report).unwrap(), body);
    }
}
