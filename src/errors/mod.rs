use thiserror::Error;

use crate::credentials::CredentialError;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Resolution errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Screen name not found: {0}")]
    ScreenNameNotFound(String),

    #[error("Unknown resource: {0}")]
    Unknown(String),

    #[error("Unsupported feed source: {0}")]
    UnsupportedSource(String),

    #[error("No linked account: {0}")]
    NoLinkedAccount(String),

    // Feed errors
    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Feed already exists: {0}")]
    FeedAlreadyExists(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Response decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
