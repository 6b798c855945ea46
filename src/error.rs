//! Error types for the RFB client engine.

use std::io;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving an RFB session.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying byte stream failed: connect failure, premature close, or timeout.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The handshake prefix was not `"RFB "`.
    #[error("not an RFB server")]
    NotRfbServer,

    /// The server advertised zero security types along with a reason.
    #[error("handshake rejected: {0}")]
    HandshakeRejected(String),

    /// No security type offered by the server is supported by this client.
    #[error("unsupported authentication: {0}")]
    UnsupportedAuth(String),

    /// The server requires VNC authentication but no password was configured.
    #[error("password required but not configured")]
    PasswordRequired,

    /// VNC authentication failed (SecurityResult status 1).
    #[error("authentication failed")]
    AuthFailed,

    /// VNC authentication failed due to too many attempts (SecurityResult status 2).
    #[error("authentication failed: too many attempts")]
    AuthFailedTooManyAttempts,

    /// VNC authentication failed with a server-supplied reason (any other nonzero status).
    #[error("authentication failed: {0}")]
    AuthFailedReason(String),

    /// A rectangle declared an encoding this client does not implement.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(i32),

    /// A server-to-client message used a type byte this client does not recognize.
    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    /// A symbolic key name could not be resolved to a keysym.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A zlib-encoded rectangle's compressed payload was corrupt or did not
    /// inflate to the pixel count its header declared.
    #[error("corrupt rectangle data: {0}")]
    CorruptRectangle(String),
}
