use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use url::{Position, Url};

use crate::config::ApiKeys;
use crate::errors::{BridgeError, BridgeResult};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// Everything needed to sign a request on behalf of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl OAuthCredentials {
    pub fn new(keys: &ApiKeys, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: keys.consumer_key.clone(),
            consumer_secret: keys.consumer_secret.clone(),
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

/// HMAC-SHA1 signer for OAuth 1.0a requests.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: OAuthCredentials,
}

impl RequestSigner {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// Build the `Authorization` header value with a fresh nonce and timestamp.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> BridgeResult<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> BridgeResult<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.credentials.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.credentials.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let signature = self.signature(method, url, params, &oauth_params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        oauth_params: &[(String, String)],
    ) -> BridgeResult<String> {
        let parsed = Url::parse(url).map_err(|e| BridgeError::InvalidUrl(e.to_string()))?;
        let base_url = &parsed[..Position::AfterPath];

        // Query pairs already on the URL are signed alongside the explicit ones
        let mut pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (encode(&k), encode(&v)))
            .chain(params.iter().map(|(k, v)| (encode(k), encode(v))))
            .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        pairs.sort();

        let normalized: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(base_url),
            encode(&normalized.join("&"))
        );

        let signing_key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| BridgeError::Config(format!("Invalid signing key: {}", e)))?;
        mac.update(base_string.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference request from the platform's "Creating a signature" guide
    fn reference_signer() -> RequestSigner {
        RequestSigner::new(OAuthCredentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        })
    }

    fn reference_params() -> Vec<(String, String)> {
        vec![
            (
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
            ("include_entities".to_string(), "true".to_string()),
        ]
    }

    #[test]
    fn test_reference_signature() {
        let header = reference_signer()
            .authorization_header_with(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json",
                &reference_params(),
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                "1318622958",
            )
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_signature="hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D""#));
        assert!(header.contains(r#"oauth_consumer_key="xvz1evFS4wEEPTGEFPHBog""#));
        assert!(header.contains(r#"oauth_version="1.0""#));
    }

    #[test]
    fn test_query_on_url_is_signed_like_explicit_params() {
        let signer = reference_signer();
        let params = reference_params();
        let explicit = signer
            .authorization_header_with(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json",
                &params,
                "nonce",
                "1",
            )
            .unwrap();
        let inline = signer
            .authorization_header_with(
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json?include_entities=true",
                &params[..1],
                "nonce",
                "1",
            )
            .unwrap();

        assert_eq!(explicit, inline);
    }

    #[test]
    fn test_fresh_nonce_per_header() {
        let signer = reference_signer();
        let a = signer
            .authorization_header("GET", "https://api.twitter.com/1.1/statuses/home_timeline.json", &[])
            .unwrap();
        let b = signer
            .authorization_header("GET", "https://api.twitter.com/1.1/statuses/home_timeline.json", &[])
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_url() {
        let result = reference_signer().authorization_header("GET", "not a url", &[]);
        assert!(matches!(result, Err(BridgeError::InvalidUrl(_))));
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
    }
}
