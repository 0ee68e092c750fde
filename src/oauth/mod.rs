//! OAuth 1.0a plumbing: the result of a completed handshake and a client that
//! issues signed GET requests with the resulting token pair.

mod client;
mod handshake;
mod signer;

pub use client::{OAuthClient, SignedHttpClient};
pub use handshake::HandshakeResult;
pub use signer::{OAuthCredentials, RequestSigner};
