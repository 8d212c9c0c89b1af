//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
///
/// None of these are fatal: a rejected token falls back to anonymous
/// sign-in, and a failed anonymous sign-in leaves the session
/// unauthenticated.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend refused the supplied token or the anonymous sign-up.
    #[error("Sign-in rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other non-success response from the auth backend.
    #[error("Auth backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The backend answered 2xx but the body had no usable user id.
    #[error("Malformed auth response: {0}")]
    MalformedResponse(String),

    /// Invalid state transition in the bootstrap FSM
    #[error("Invalid bootstrap transition: {0}")]
    InvalidStateTransition(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Returns true for connection failures, timeouts and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            AuthError::Backend { status, .. } => *status >= 500,
            AuthError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                e.status().is_some_and(|status| status.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = AuthError::Backend {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn rejections_are_not_transient() {
        let err = AuthError::Rejected {
            status: 401,
            message: "invalid JWT".to_string(),
        };
        assert!(!err.is_transient());
        assert!(!AuthError::MalformedResponse("no id".to_string()).is_transient());
    }
}
