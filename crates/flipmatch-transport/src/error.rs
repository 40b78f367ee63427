//! Error types for the transport layer.

/// Errors that can occur at the transport level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to accept an incoming connection.
    #[error("accept failed: {0}")]
    AcceptFailed(std::io::Error),

    /// Failed to send data on a connection.
    #[error("send failed: {0}")]
    SendFailed(std::io::Error),

    /// Failed to receive data from a connection.
    #[error("receive failed: {0}")]
    ReceiveFailed(std::io::Error),

    /// The connection is closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}
