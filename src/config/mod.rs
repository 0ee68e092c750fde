use crate::errors::{BridgeError, BridgeResult};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application-level OAuth consumer key material, shared by every account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeys {
    pub consumer_key: String,
    pub consumer_secret: String,
}

impl ApiKeys {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub db_path: String,
    pub api_base: String,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> BridgeResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let consumer_key = std::env::var("FEEDBRIDGE_CONSUMER_KEY")
            .map_err(|_| BridgeError::MissingEnvVar("FEEDBRIDGE_CONSUMER_KEY".to_string()))?;

        let consumer_secret = std::env::var("FEEDBRIDGE_CONSUMER_SECRET")
            .map_err(|_| BridgeError::MissingEnvVar("FEEDBRIDGE_CONSUMER_SECRET".to_string()))?;

        // Default db_path is relative to executable directory
        let db_path = std::env::var("FEEDBRIDGE_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("feedbridge.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./feedbridge.db".to_string())
        });

        let api_base = std::env::var("FEEDBRIDGE_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let http_timeout_secs = match std::env::var("FEEDBRIDGE_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                BridgeError::Config(format!("FEEDBRIDGE_HTTP_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            consumer_key,
            consumer_secret,
            db_path,
            api_base,
            http_timeout_secs,
        })
    }

    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys::new(self.consumer_key.clone(), self.consumer_secret.clone())
    }
}
