//! Error types for the Mailjet provider
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the Mailjet provider
#[derive(Error, Debug)]
pub enum Error {
    /// The remote call itself failed (network, unexpected status, 5xx)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record not found or unreadable
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A result set did not contain exactly one record
    #[error("Inconsistent response for {context}: expected 1 response entry, got {got}")]
    InconsistentResponse {
        /// What was being fetched or created
        context: String,
        /// Number of records actually returned
        got: usize,
    },

    /// The remote refused to create a record
    #[error("Creation failed: {0}")]
    CreationFailed(String),

    /// Reviving a soft-deleted sender failed, on its update or its re-read
    #[error("Could not update sender {email}: {source}")]
    AdoptionFailed {
        /// Email of the sender being adopted
        email: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The remote validation action errored
    #[error("Unexpected error while validating the sender: {0}")]
    ActionFailed(String),

    /// The validation action returned no validation method
    #[error("No validation methods were found for this sender")]
    NoValidationMethod,

    /// The validation action returned more than one result
    #[error("Multiple data validation information were provided unexpectedly ({0} entries)")]
    AmbiguousValidation(usize),

    /// The remote explicitly declined the validation
    #[error("Could not validate the sender: {0}")]
    ValidationRejected(String),

    /// Malformed or out-of-range `wait_for` duration
    #[error("Invalid wait_for duration: {0}")]
    ValidationInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an inconsistent-cardinality error
    pub fn inconsistent(context: impl Into<String>, got: usize) -> Self {
        Self::InconsistentResponse {
            context: context.into(),
            got,
        }
    }

    /// Create a creation failure
    pub fn creation_failed(msg: impl Into<String>) -> Self {
        Self::CreationFailed(msg.into())
    }

    /// Wrap a failure on the adoption path of a sender
    pub fn adoption_failed(email: impl Into<String>, source: Error) -> Self {
        Self::AdoptionFailed {
            email: email.into(),
            source: Box::new(source),
        }
    }

    /// Create a validation action failure
    pub fn action_failed(msg: impl Into<String>) -> Self {
        Self::ActionFailed(msg.into())
    }

    /// Create a validation rejection carrying the remote reason
    pub fn validation_rejected(reason: impl Into<String>) -> Self {
        Self::ValidationRejected(reason.into())
    }

    /// Create a `wait_for` input error
    pub fn validation_input(msg: impl Into<String>) -> Self {
        Self::ValidationInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the remote call itself failed, as opposed to a well-formed
    /// response the core rejected
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Authentication(_) | Self::RateLimited(_) | Self::NotFound(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inconsistent_response_message_names_the_count() {
        let err = Error::inconsistent("sender #42", 2);
        assert_eq!(
            err.to_string(),
            "Inconsistent response for sender #42: expected 1 response entry, got 2"
        );
    }

    #[test]
    fn rejection_carries_remote_reason() {
        let err = Error::validation_rejected("DNS record not found");
        assert_eq!(
            err.to_string(),
            "Could not validate the sender: DNS record not found"
        );
    }

    #[test]
    fn adoption_failure_names_the_email_and_cause() {
        let err = Error::adoption_failed("a@example.com", Error::transport("timeout"));
        assert_eq!(
            err.to_string(),
            "Could not update sender a@example.com: Transport error: timeout"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_classification() {
        assert!(Error::transport("timeout").is_transport());
        assert!(Error::auth("bad key").is_transport());
        assert!(!Error::NoValidationMethod.is_transport());
        assert!(!Error::inconsistent("x", 0).is_transport());
    }
}
