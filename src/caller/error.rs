//! Failure outcomes of a greeting call.

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;
use tonic::{Code, Status};

use crate::SHUTDOWN_MESSAGE;

#[derive(Debug, Error)]
pub enum CallError {
    /// The configured endpoint is not a valid URI.
    #[error("invalid endpoint '{endpoint}'")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// The responder could not be reached, or the connection was lost mid-call.
    #[error("transport unavailable: {reason}")]
    TransportUnavailable { reason: String },

    /// The responder is draining and refused the call.
    #[error("responder is shutting down")]
    ShutdownInProgress,

    /// No reply arrived before the deadline.
    #[error("no reply within {0:?}")]
    DeadlineExceeded(Duration),

    /// Any other status returned by the responder.
    #[error("call failed: {0}")]
    Rpc(Status),
}

impl CallError {
    pub(crate) fn unreachable(err: &tonic::transport::Error) -> Self {
        Self::TransportUnavailable {
            reason: error_chain(err),
        }
    }

    pub(crate) fn from_status(status: Status, deadline: Option<Duration>) -> Self {
        match (status.code(), deadline) {
            (Code::Unavailable, _) if status.message() == SHUTDOWN_MESSAGE => {
                Self::ShutdownInProgress
            }
            (Code::Unavailable, _) => Self::TransportUnavailable {
                reason: status.message().to_string(),
            },
            (Code::DeadlineExceeded, deadline) => {
                Self::DeadlineExceeded(deadline.unwrap_or_default())
            }
            // The responder cancels calls whose grpc-timeout expired.
            (Code::Cancelled, Some(deadline)) => Self::DeadlineExceeded(deadline),
            _ => Self::Rpc(status),
        }
    }
}

/// Join an error and its sources into one line; tonic's transport errors
/// keep the useful detail in the source chain.
fn error_chain(err: &dyn StdError) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_status_maps_to_shutdown_in_progress() {
        let err = CallError::from_status(Status::unavailable(SHUTDOWN_MESSAGE), None);
        assert!(matches!(err, CallError::ShutdownInProgress));
    }

    #[test]
    fn test_other_unavailable_maps_to_transport() {
        let err = CallError::from_status(Status::unavailable("connection reset"), None);
        assert!(
            matches!(err, CallError::TransportUnavailable { ref reason } if reason == "connection reset")
        );
    }

    #[test]
    fn test_deadline_status_keeps_requested_deadline() {
        let deadline = Duration::from_millis(300);
        let err = CallError::from_status(Status::deadline_exceeded("late"), Some(deadline));
        assert!(matches!(err, CallError::DeadlineExceeded(d) if d == deadline));
    }

    #[test]
    fn test_cancelled_without_deadline_is_kept() {
        let err = CallError::from_status(Status::cancelled("gone"), None);
        assert!(matches!(err, CallError::Rpc(ref status) if status.code() == Code::Cancelled));
    }

    #[test]
    fn test_unexpected_status_is_kept() {
        let err = CallError::from_status(Status::internal("boom"), None);
        match err {
            CallError::Rpc(status) => assert_eq!(status.code(), Code::Internal),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
