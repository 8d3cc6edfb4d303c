//! Error types for the responder endpoint.

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be opened.
    #[error("failed to bind responder to {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The gRPC server failed while serving.
    #[error("gRPC transport error")]
    Transport(#[from] tonic::transport::Error),

    /// The serve task panicked or was cancelled.
    #[error("responder task failed")]
    Task(#[from] tokio::task::JoinError),
}
