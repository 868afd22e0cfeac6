//! HTTP plumbing shared by every capability adapter.

use std::time::Duration;

use leafscan_types::DiagnosisError;

/// Build the HTTP client a capability adapter talks through.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Map a transport failure of `service` onto the diagnosis taxonomy.
pub fn transport_error(service: &str, err: &reqwest::Error) -> DiagnosisError {
    if err.is_timeout() {
        return DiagnosisError::UpstreamTimeout { service: service.to_string() };
    }
    if let Some(status) = err.status() {
        return DiagnosisError::UpstreamStatus {
            service: service.to_string(),
            status: status.as_u16(),
            message: err.to_string(),
        };
    }
    DiagnosisError::UpstreamUnreachable { service: service.to_string(), message: err.to_string() }
}

/// Pass 2xx responses through; turn anything else into `UpstreamStatus`
/// carrying the response body.
pub async fn ensure_success(
    service: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, DiagnosisError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(DiagnosisError::UpstreamStatus {
        service: service.to_string(),
        status: status.as_u16(),
        message: body,
    })
}

/// A 2xx body that does not have the expected shape.
pub fn malformed_body(service: &str, detail: impl std::fmt::Display) -> DiagnosisError {
    DiagnosisError::UpstreamStatus {
        service: service.to_string(),
        status: 502,
        message: format!("Invalid API response: {}", detail),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_non_success_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let resp = client.get(server.uri()).send().await.unwrap();
        let err = ensure_success("speech", resp).await.unwrap_err();
        assert_eq!(
            err,
            DiagnosisError::UpstreamStatus {
                service: "speech".to_string(),
                status: 503,
                message: "overloaded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_maps_to_upstream_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = build_http_client(1).unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        assert_eq!(
            transport_error("generator", &err),
            DiagnosisError::UpstreamTimeout { service: "generator".to_string() }
        );
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_unreachable() {
        let client = build_http_client(2).unwrap();
        let err = client.get("http://127.0.0.1:9").send().await.unwrap_err();
        assert!(matches!(
            transport_error("classifier", &err),
            DiagnosisError::UpstreamUnreachable { .. }
        ));
    }
}
