//! State and errors of the login screen

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::locale::Locale;

/// Length of a one-time code
pub const CODE_LENGTH: usize = 6;

/// Which half of the login screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Entering the phone number
    #[default]
    Input,
    /// Entering the code sent to the phone
    CodeEntry,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Input => f.write_str("entering the phone number"),
            Step::CodeEntry => f.write_str("entering the code"),
        }
    }
}

/// Snapshot of the login screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LoginState {
    /// `+91` followed by up to ten digits, or empty
    pub phone_number: String,
    /// Up to six characters as typed
    pub code: String,
    pub step: Step,
    /// A provider call is outstanding
    pub loading: bool,
    pub locale: Locale,
}

/// Remote call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendCode,
    VerifyCode,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::SendCode => f.write_str("send code"),
            Operation::VerifyCode => f.write_str("verify code"),
        }
    }
}

/// Input rejected before anything is sent
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid code")]
    InvalidCode,
}

/// Errors surfaced by the login flow.
///
/// None of these is fatal: the flow is interactive again, with `loading`
/// cleared, whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The auth provider refused the request
    #[error("provider error: {0}")]
    Provider(String),

    /// The auth provider could not be reached
    #[error("failed to {operation}: {detail}")]
    Transport { operation: Operation, detail: String },

    /// Another provider call is still outstanding
    #[error("a request is already in progress")]
    Busy,

    #[error("not available while {0}")]
    WrongStep(Step),

    /// The screen was closed; late results are dropped
    #[error("login flow is detached")]
    Detached,
}

impl LoginError {
    /// Text for the alert shown to the user
    pub fn user_message(&self) -> &str {
        match self {
            LoginError::Validation(ValidationError::InvalidPhoneNumber) => {
                "Please enter a valid phone number"
            }
            LoginError::Validation(ValidationError::InvalidCode) => {
                "Please enter a valid 6-digit code"
            }
            LoginError::Provider(message) => message.as_str(),
            LoginError::Transport {
                operation: Operation::SendCode,
                ..
            } => "Failed to send code",
            LoginError::Transport {
                operation: Operation::VerifyCode,
                ..
            } => "Failed to verify code",
            LoginError::Busy => "Please wait...",
            LoginError::WrongStep(Step::Input) => "Request a code first",
            LoginError::WrongStep(Step::CodeEntry) => "A code has already been sent",
            LoginError::Detached => "This screen is no longer active",
        }
    }
}
