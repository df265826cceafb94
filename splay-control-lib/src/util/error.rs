//! Error types for the library

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::control_interface::commands::CommandType;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// The stage of a command round-trip an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Acquiring a session token over the WebSocket.
    Handshake,
    /// Sending the command to the HTTP API and reading its response.
    Dispatch,
}

/// Everything that can go wrong while talking to a device.
///
/// None of these are retried by the library. Callers that want a retry
/// policy can use [`Error::phase`] and [`Error::is_timeout`] to build one.
#[derive(Error, Debug)]
pub enum Error {
    /// No token message arrived within the handshake timeout.
    #[error("S-Play handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// The WebSocket connection failed while waiting for the token.
    #[error("S-Play handshake WebSocket error: {0}")]
    HandshakeTransport(#[from] tungstenite::Error),

    /// The first message was not a token-bearing envelope.
    #[error("S-Play handshake protocol error: {0}")]
    HandshakeProtocol(String),

    /// The API did not answer within the request timeout.
    #[error("S-Play HTTP API request timed out after {0:?}")]
    DispatchTimeout(Duration),

    /// The HTTP request itself failed.
    #[error("Problem with request: {0}")]
    DispatchTransport(#[from] reqwest::Error),

    /// The response body was not JSON.
    #[error("Error parsing JSON from S-Play: {0}")]
    ResponseParse(#[source] serde_json::Error),

    /// The response body was JSON, but not an object.
    #[error("Bad data format from S-Play: {body}")]
    ResponseFormat { body: String },

    /// The device reported a failure and said why.
    #[error("S-Play error: {0}")]
    DeviceReported(String),

    /// The device reported a failure without an `error` field.
    #[error("S-Play error. Data: {body}")]
    UnknownDeviceFailure { body: String },

    /// A success response that does not have the shape expected for the command.
    #[error("Unexpected response to {command:?} from S-Play: {source}. Data: {body}")]
    UnexpectedResponse {
        command: CommandType,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The command could not be encoded as JSON.
    #[error("Failed to serialize {command:?}: {source}")]
    Serialize {
        command: CommandType,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Which part of the round-trip failed.
    pub fn phase(&self) -> Phase {
        match self {
            Error::HandshakeTimeout(_)
            | Error::HandshakeTransport(_)
            | Error::HandshakeProtocol(_) => Phase::Handshake,
            _ => Phase::Dispatch,
        }
    }

    /// Whether the error is one of the two per-phase timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::HandshakeTimeout(_) | Error::DispatchTimeout(_))
    }
}
