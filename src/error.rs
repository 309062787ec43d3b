//! Error handling for the Meter Down client

use std::fmt;
use thiserror::Error;

/// Unified error type for application startup and the auth collaborator
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] meter_down_auth::AuthError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
