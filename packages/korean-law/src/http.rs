//! HTTP client wrapper for the law.go.kr Open API.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{LawError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("korean-law/", env!("CARGO_PKG_VERSION"));

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Create a configured HTTP client.
///
/// # Arguments
/// * `timeout` - Per-request timeout
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Build a URL with query parameters.
///
/// # Examples
/// ```
/// use korean_law::http::build_url;
///
/// let url = build_url("https://www.law.go.kr/DRF/lawSearch.do", &[("query", "민법")]).unwrap();
/// assert!(url.as_str().starts_with("https://www.law.go.kr/DRF/lawSearch.do?query="));
/// ```
pub fn build_url(base: &str, params: &[(&str, &str)]) -> Result<Url> {
    Ok(Url::parse_with_params(base, params)?)
}

/// Download a URL as text, retrying transient failures.
///
/// Uses exponential backoff for connection errors, timeouts and 5xx responses.
/// Client errors (4xx) are returned immediately.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - URL to download
/// * `target` - Short description of what is fetched, for errors and logs
pub async fn download_text(client: &Client, url: &Url, target: &str) -> Result<String> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            tracing::debug!(attempt, delay_ms = delay, resource = target, "Retrying after delay");
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        resource = target,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                if !status.is_success() {
                    return Err(LawError::HttpStatus {
                        status: status.as_u16(),
                        target: target.to_string(),
                    });
                }

                return Ok(response.text().await?);
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        resource = target,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(LawError::Http(e));
            }
        }
    }

    Err(LawError::RetriesExhausted {
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_create_client() {
        assert!(create_client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_build_url_encodes_hangul() {
        let url = build_url("https://example.com/search", &[("query", "민법"), ("type", "XML")])
            .unwrap();
        assert_eq!(url.query_pairs().count(), 2);
        assert!(url.as_str().contains("type=XML"));
        assert!(!url.as_str().contains("민법"));
    }

    #[tokio::test]
    async fn test_download_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .and(query_param("ID", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .mount(&server)
            .await;

        let client = create_client(Duration::from_secs(5)).unwrap();
        let url = build_url(&format!("{}/doc", server.uri()), &[("ID", "1")]).unwrap();
        let body = download_text(&client, &url, "test").await.unwrap();
        assert_eq!(body, "<ok/>");
    }

    #[tokio::test]
    async fn test_download_text_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(Duration::from_secs(5)).unwrap();
        let url = build_url(&format!("{}/missing", server.uri()), &[]).unwrap();
        let err = download_text(&client, &url, "missing").await.unwrap_err();
        assert!(matches!(err, LawError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_download_text_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(u64::from(MAX_RETRIES))
            .mount(&server)
            .await;

        let client = create_client(Duration::from_secs(5)).unwrap();
        let url = build_url(&format!("{}/flaky", server.uri()), &[]).unwrap();
        let err = download_text(&client, &url, "flaky").await.unwrap_err();
        assert!(matches!(err, LawError::RetriesExhausted { attempts: 3, .. }));
    }
}
