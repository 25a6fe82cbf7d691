use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::retry::{RetryPolicy, retry_with_backoff};

// Maps a response to `LoadError::Status` unless it is a 2xx.
pub fn check_status(status: StatusCode) -> Result<(), LoadError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(LoadError::Status(status.as_u16()))
    }
}

/// GET-only client for the site's static JSON and PDF assets. Every request
/// goes through the retry policy and stops as soon as its token is cancelled.
#[derive(Clone, Debug)]
pub struct JsonClient {
    client: Client,
    policy: RetryPolicy,
}

impl Default for JsonClient {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl JsonClient {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    async fn send_once(&self, url: &str, token: &CancellationToken) -> Result<Response, LoadError> {
        let request = self.client.get(url).send();
        let response = tokio::select! {
            _ = token.cancelled() => return Err(LoadError::Cancelled),
            response = request => response?,
        };
        check_status(response.status())?;
        Ok(response)
    }

    pub async fn get(&self, url: &str, token: &CancellationToken) -> Result<Response, LoadError> {
        retry_with_backoff(self.policy, token, move |attempt| {
            log::debug!("GET {url} (attempt {})", attempt + 1);
            self.send_once(url, token)
        })
        .await
    }

    /// Fetches and decodes JSON. A body that does not match `T` is a schema
    /// failure and is not retried.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &CancellationToken,
    ) -> Result<T, LoadError> {
        let bytes = self.get_bytes(url, token).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Invalid JSON from {url}: {e}");
            LoadError::Schema(e.to_string())
        })
    }

    pub async fn get_bytes(&self, url: &str, token: &CancellationToken) -> Result<Vec<u8>, LoadError> {
        let response = self.get(url, token).await?;
        let body = tokio::select! {
            _ = token.cancelled() => return Err(LoadError::Cancelled),
            body = response.bytes() => body?,
        };
        Ok(body.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::serve;
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_check_status() {
        assert_eq!(check_status(StatusCode::OK), Ok(()));
        assert_eq!(check_status(StatusCode::NO_CONTENT), Ok(()));
        assert_eq!(
            check_status(StatusCode::SERVICE_UNAVAILABLE),
            Err(LoadError::Status(503))
        );
        assert_eq!(check_status(StatusCode::NOT_FOUND), Err(LoadError::Status(404)));
    }

    #[tokio::test]
    async fn test_cancelled_request_never_hits_network() {
        let client = JsonClient::default();
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<serde_json::Value, _> =
            client.get_json("http://127.0.0.1:9/scripts.json", &token).await;
        assert_eq!(result, Err(LoadError::Cancelled));
    }

    fn quick_retries() -> JsonClient {
        JsonClient::new(RetryPolicy::new(2, Duration::from_millis(5)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_url_fails_without_retrying() {
        let client = JsonClient::default();
        let token = CancellationToken::new();
        let started = tokio::time::Instant::now();

        let result: Result<serde_json::Value, _> = client.get_json("/scripts.json", &token).await;

        assert!(matches!(result, Err(LoadError::Request(_))), "{result:?}");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_unavailable_is_retried_until_success() {
        let server = serve(|hit, _| match hit {
            0 | 1 => (503, b"busy".to_vec()),
            _ => (200, b"[1,2]".to_vec()),
        })
        .await;
        let token = CancellationToken::new();

        let result: Result<Vec<u32>, _> = quick_retries()
            .get_json(&format!("{}/scripts.json", server.base_url), &token)
            .await;

        assert_eq!(result, Ok(vec![1, 2]));
        assert_eq!(server.hits(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_tried_once() {
        let server = serve(|_, _| (404, b"missing".to_vec())).await;
        let token = CancellationToken::new();

        let result: Result<serde_json::Value, _> = quick_retries()
            .get_json(&format!("{}/scripts.json", server.base_url), &token)
            .await;

        assert_eq!(result, Err(LoadError::Status(404)));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_bad_body_is_a_schema_error() {
        let server = serve(|_, _| (200, b"{nope".to_vec())).await;
        let token = CancellationToken::new();

        let result: Result<serde_json::Value, _> = quick_retries()
            .get_json(&format!("{}/scripts.json", server.base_url), &token)
            .await;

        assert!(matches!(result, Err(LoadError::Schema(_))), "{result:?}");
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_get_bytes_returns_body() {
        let server = serve(|_, path| (200, path.as_bytes().to_vec())).await;
        let token = CancellationToken::new();

        let body = quick_retries()
            .get_bytes(&format!("{}/pdf/tb.pdf", server.base_url), &token)
            .await;

        assert_eq!(body, Ok(b"/pdf/tb.pdf".to_vec()));
    }
}
