//! Error types for the host server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// Failed to bind the listening socket.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
