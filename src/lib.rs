pub mod cli;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod errors;
pub mod oauth;
pub mod providers;
pub mod services;
pub mod storage;
