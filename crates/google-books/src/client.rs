//! Google Books volumes API client implementation.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, error, instrument, trace};

use crate::error::GoogleBooksError;
use crate::types::Volumes;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Google Books volumes search endpoint.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http_client: Client,
    base_url: String,
}

impl GoogleBooksClient {
    /// Creates a client with the default endpoint and request timeout.
    pub fn new() -> Result<Self, GoogleBooksError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Creates a client whose transport gives up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, GoogleBooksError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("booklens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL for the API (useful for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page for an already encoded query string (`q=...&startIndex=...`).
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn volumes(&self, query: &str) -> Result<Volumes, GoogleBooksError> {
        let url = format!("{}?{}", self.base_url, query);
        debug!(url = %url, "Sending volumes request to Google Books");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                error!("Request timed out");
                return GoogleBooksError::Timeout;
            }
            error!(error = %e, "Network error during Google Books request");
            GoogleBooksError::Network(e)
        })?;

        let status = response.status();
        debug!(status = %status, "Received response from Google Books");

        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                error!(status = status_code, "Rate limit exceeded");
                return Err(GoogleBooksError::RateLimited);
            }

            error!(status = status_code, body = %body, "Google Books API error");
            return Err(GoogleBooksError::ApiError {
                status: status_code,
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                return GoogleBooksError::Timeout;
            }
            error!(error = %e, "Failed to read response body");
            GoogleBooksError::Network(e)
        })?;

        trace!(body = %body, "Response body");

        let volumes: Volumes = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Google Books response");
            GoogleBooksError::InvalidResponse(format!("JSON parse error: {e}"))
        })?;

        debug!(
            total_items = volumes.total_items,
            page_items = volumes.items.len(),
            "Volumes page fetched"
        );

        Ok(volumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleBooksClient {
        GoogleBooksClient::new()
            .unwrap()
            .with_base_url(format!("{}/books/v1/volumes", server.uri()))
    }

    #[test]
    fn test_client_creation() {
        let client = GoogleBooksClient::new().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_with_base_url() {
        let client = GoogleBooksClient::new()
            .unwrap()
            .with_base_url("http://localhost:9999/volumes");
        assert_eq!(client.base_url(), "http://localhost:9999/volumes");
    }

    #[tokio::test]
    async fn fetches_and_decodes_a_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/books/v1/volumes"))
            .and(query_param("q", "intitle:dune"))
            .and(query_param("maxResults", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "kind": "books#volumes",
                "totalItems": 57,
                "items": [
                    {"id": "a", "volumeInfo": {"title": "Dune"}},
                    {"id": "b", "volumeInfo": {"title": "Dune Messiah"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .volumes("q=intitle:dune&maxResults=2")
            .await
            .unwrap();

        assert_eq!(page.total_items, 57);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].title(), "Dune Messiah");
    }

    #[tokio::test]
    async fn rate_limit_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).volumes("q=x").await.unwrap_err();
        assert!(matches!(err, GoogleBooksError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server).volumes("q=x").await.unwrap_err();
        match err {
            GoogleBooksError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "backend unavailable");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).volumes("q=x").await.unwrap_err();
        assert!(matches!(err, GoogleBooksError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"totalItems": 0}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GoogleBooksClient::with_timeout(Duration::from_millis(50))
            .unwrap()
            .with_base_url(format!("{}/books/v1/volumes", server.uri()));
        let err = client.volumes("q=x").await.unwrap_err();
        assert!(matches!(err, GoogleBooksError::Timeout));
    }
}
