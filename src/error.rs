use thiserror::Error;

/// Failures talking to the remote move service.
///
/// The controller treats every variant exactly like an explicit
/// `status: error` reply.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("engine request failed: {0}")]
    Transport(String),
    #[error("engine request timed out")]
    Timeout,
    #[error("engine returned HTTP {0}")]
    Status(u16),
    #[error("malformed engine response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout
        } else if err.is_decode() {
            RemoteError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            RemoteError::Status(status.as_u16())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("black move recorded for turn {0} before white moved")]
    OutOfOrder(u32),
}
