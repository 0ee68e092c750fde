use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use crate::errors::BridgeResult;
use crate::oauth::signer::{OAuthCredentials, RequestSigner};

/// Authenticated GET capability against the remote API.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Returns the raw response body; non-2xx statuses are transport errors.
    async fn get(&self, url: &str, params: &[(String, String)]) -> BridgeResult<Vec<u8>>;
}

#[async_trait]
impl<C: OAuthClient + ?Sized> OAuthClient for Arc<C> {
    async fn get(&self, url: &str, params: &[(String, String)]) -> BridgeResult<Vec<u8>> {
        (**self).get(url, params).await
    }
}

/// [`OAuthClient`] backed by reqwest, signing every request with HMAC-SHA1.
pub struct SignedHttpClient {
    client: Client,
    signer: RequestSigner,
}

impl SignedHttpClient {
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            signer: RequestSigner::new(credentials),
        }
    }
}

#[async_trait]
impl OAuthClient for SignedHttpClient {
    async fn get(&self, url: &str, params: &[(String, String)]) -> BridgeResult<Vec<u8>> {
        let authorization = self.signer.authorization_header("GET", url, params)?;

        debug!(url, params = params.len(), "signed GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BridgeError;
    use wiremock::matchers::{header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> SignedHttpClient {
        SignedHttpClient::new(
            OAuthCredentials {
                consumer_key: "ck".to_string(),
                consumer_secret: "cs".to_string(),
                token: "t1".to_string(),
                token_secret: "s1".to_string(),
            },
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_get_sends_signed_request_with_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/statuses/home_timeline.json"))
            .and(query_param("tweet_mode", "extended"))
            .and(header_regex("authorization", r#"^OAuth .*oauth_token="t1""#))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/1.1/statuses/home_timeline.json", mock_server.uri());
        let params = vec![("tweet_mode".to_string(), "extended".to_string())];
        let body = client().get(&url, &params).await.unwrap();

        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"errors\":[]}"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/1.1/users/show.json", mock_server.uri());
        let result = client().get(&url, &[]).await;

        assert!(matches!(result, Err(BridgeError::Http(_))));
    }

    #[tokio::test]
    async fn test_shared_client_through_arc() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let shared = Arc::new(client());
        let url = format!("{}/1.1/users/show.json", mock_server.uri());
        let body = shared.get(&url, &[]).await.unwrap();

        assert_eq!(body, b"{}");
    }
}
