//! The authentication collaborator seen by the login flow

use async_trait::async_trait;
use meter_down_auth::{Auth, AuthError, Session};
use thiserror::Error;

/// Why the provider did not complete a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The provider answered and refused, with a message for the user
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or its answer was unreadable
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<AuthError> for ProviderFailure {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ApiError { message, .. } => ProviderFailure::Rejected(message),
            AuthError::MissingSession => ProviderFailure::Rejected(err.to_string()),
            AuthError::NetworkError(_) | AuthError::SerializationError(_) => {
                ProviderFailure::Transport(err.to_string())
            }
        }
    }
}

/// Sends and verifies one-time codes for a phone number
#[async_trait]
pub trait OtpProvider: Send + Sync {
    /// Request a one-time code for `phone`
    async fn send_code(&self, phone: &str) -> Result<(), ProviderFailure>;

    /// Exchange `phone` and `code` for a session
    async fn verify_code(&self, phone: &str, code: &str) -> Result<Session, ProviderFailure>;
}

#[async_trait]
impl OtpProvider for Auth {
    async fn send_code(&self, phone: &str) -> Result<(), ProviderFailure> {
        Ok(self.send_otp(phone).await?)
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<Session, ProviderFailure> {
        Ok(self.verify_otp(phone, code).await?)
    }
}
