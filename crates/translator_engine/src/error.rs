use std::fmt;

/// Failure classes shared by every provider. All of them end the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required credential is missing; no request was sent.
    Configuration,
    /// The provider rejected the credential.
    Auth,
    /// The provider is throttling us.
    RateLimit,
    /// Network failure or an HTTP status not covered above.
    Transport,
    /// The response body did not have the expected shape.
    Protocol,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration error"),
            ErrorKind::Auth => write!(f, "authentication error"),
            ErrorKind::RateLimit => write!(f, "rate limited"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Protocol => write!(f, "protocol error"),
        }
    }
}

/// Error returned by a provider. `message` is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TranslateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TranslateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
