use std::collections::HashMap;

use crate::errors::{BridgeError, BridgeResult};

/// Token pair plus whatever extra parameters the access-token endpoint
/// returned (`screen_name`, `user_id`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeResult {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub parameters: HashMap<String, String>,
}

impl HandshakeResult {
    pub fn new(oauth_token: impl Into<String>, oauth_token_secret: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            oauth_token_secret: oauth_token_secret.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Parse a form-encoded access-token response body.
    pub fn from_response_body(body: &str) -> BridgeResult<Self> {
        let mut token = None;
        let mut secret = None;
        let mut parameters = HashMap::new();

        for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
            match key.as_ref() {
                "oauth_token" => token = Some(value.into_owned()),
                "oauth_token_secret" => secret = Some(value.into_owned()),
                _ => {
                    parameters.insert(key.into_owned(), value.into_owned());
                }
            }
        }

        match (token, secret) {
            (Some(oauth_token), Some(oauth_token_secret)) => Ok(Self {
                oauth_token,
                oauth_token_secret,
                parameters,
            }),
            _ => Err(BridgeError::InvalidInput(
                "access token response is missing the token pair".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_body() {
        let body = "oauth_token=6253282-eWudHldSbIaelX7swmsiHImEL4KinwaGloHANdrY&oauth_token_secret=2EEfA6BG3ly3sR3RjE0IBSnlQu4ZrUzPiYKmrkVU&user_id=6253282&screen_name=twitterapi";
        let result = HandshakeResult::from_response_body(body).unwrap();

        assert_eq!(result.oauth_token, "6253282-eWudHldSbIaelX7swmsiHImEL4KinwaGloHANdrY");
        assert_eq!(result.oauth_token_secret, "2EEfA6BG3ly3sR3RjE0IBSnlQu4ZrUzPiYKmrkVU");
        assert_eq!(result.parameter("screen_name"), Some("twitterapi"));
        assert_eq!(result.parameter("user_id"), Some("6253282"));
        assert_eq!(result.parameter("oauth_token"), None);
    }

    #[test]
    fn test_from_response_body_without_secret() {
        let result = HandshakeResult::from_response_body("oauth_token=abc&screen_name=alice");
        assert!(matches!(result, Err(BridgeError::InvalidInput(_))));
    }

    #[test]
    fn test_builder_parameters() {
        let result = HandshakeResult::new("t1", "s1").with_parameter("screen_name", "alice");
        assert_eq!(result.parameter("screen_name"), Some("alice"));
    }
}
