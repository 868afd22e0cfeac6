use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

use crate::backend::DiagnosisBackend;
use crate::error::ClientError;
use crate::types::*;

/// HTTP client for a running LeafScan server.
pub struct LeafscanClient {
    client: Client,
    config: ClientConfig,
}

impl LeafscanClient {
    pub fn new(mut config: ClientConfig) -> Result<Self, ClientError> {
        Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<BackendResponse, ClientError> {
        let secs = timeout.as_secs();
        let resp = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(&e, secs))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await.map_err(|e| ClientError::from_reqwest(&e, secs))?;

        tracing::debug!(status, size = body.len(), "Backend responded");
        Ok(BackendResponse { status, content_type, body })
    }
}

#[async_trait]
impl DiagnosisBackend for LeafscanClient {
    fn location(&self) -> &str {
        &self.config.base_url
    }

    async fn health(&self) -> Result<BackendResponse, ClientError> {
        self.send(self.client.get(self.url("/health")), self.config.health_timeout).await
    }

    async fn analyze(
        &self,
        plant: &str,
        file_name: &str,
        mime: &str,
        image: Vec<u8>,
    ) -> Result<BackendResponse, ClientError> {
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ClientError::Request(e.to_string()))?;
        let request = self
            .client
            .post(self.url("/analyze"))
            .query(&[("plant", plant)])
            .multipart(Form::new().part("file", part));
        self.send(request, self.config.analyze_timeout).await
    }

    async fn fetch_audio(&self, path: &str) -> Result<BackendResponse, ClientError> {
        self.send(self.client.get(self.url(path)), self.config.audio_timeout).await
    }

    async fn plant_info(&self, plant: &str) -> Result<BackendResponse, ClientError> {
        let path = format!("/plant_info/{}", plant);
        self.send(self.client.get(self.url(&path)), self.config.plant_info_timeout).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LeafscanClient {
        LeafscanClient::new(ClientConfig::new(format!("{}/", server.uri()))).unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = LeafscanClient::new(ClientConfig::new("not a url")).err().unwrap();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_analyze_uploads_multipart_with_plant_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .and(query_param("plant", "tomato"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"plant": "tomato"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let resp = client.analyze("tomato", "leaf.png", "image/png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.is_json());
        assert_eq!(resp.json_body().unwrap()["plant"], "tomato");

        let received = &server.received_requests().await.unwrap()[0];
        let content_type = received.headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&received.body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"leaf.png\""));
    }

    #[tokio::test]
    async fn test_non_success_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plant_info/pepper"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let resp = client_for(&server).plant_info("pepper").await.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.text(), "Not Found");
    }

    #[tokio::test]
    async fn test_timeout_reports_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut config = ClientConfig::new(server.uri());
        config.health_timeout = Duration::from_secs(1);
        let err = LeafscanClient::new(config).unwrap().health().await.unwrap_err();
        assert_eq!(err, ClientError::Timeout(1));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let client = LeafscanClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.fetch_audio("/audio/x.mp3").await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
