use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::StreamExt;
use log::{debug, warn};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::{
    CONNECTION, SEC_WEBSOCKET_KEY, SEC_WEBSOCKET_VERSION, UPGRADE,
};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::util::config::ClientConfig;
use crate::util::envelope::Envelope;
use crate::util::error::{Error, Result};
use crate::util::verbose;

/// The device does not check the upgrade key, so every handshake reuses this nonce.
const HANDSHAKE_NONCE: &[u8; 16] = b"the sample nonce";
const WEBSOCKET_VERSION: &str = "13";

type HandshakeSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Obtains session tokens from the device's WebSocket endpoint.
///
/// On connect the device pushes one binary envelope whose header carries a
/// token. Every call opens a fresh connection, reads that one message and
/// closes the connection again.
#[derive(Debug, Clone)]
pub struct TokenAcquirer {
    url: String,
    timeout: Duration,
    verbose: bool,
}

impl TokenAcquirer {
    pub fn new(config: &ClientConfig) -> Self {
        TokenAcquirer {
            url: config.handshake_url(),
            timeout: config.timeout,
            verbose: config.verbose,
        }
    }

    /// The `Sec-WebSocket-Key` sent with every upgrade request.
    pub fn handshake_key() -> String {
        STANDARD.encode(HANDSHAKE_NONCE)
    }

    pub async fn acquire(&self) -> Result<String> {
        verbose!(self.verbose, "Starting S-Play websocket to {}", self.url);
        // Dropping the attempt on expiry tears the socket down; nothing it
        // receives afterwards is ever looked at.
        let (socket, outcome) = match timeout(self.timeout, self.attempt()).await {
            Ok(attempt) => attempt?,
            Err(_) => {
                warn!("S-Play websocket timed out after {:?}", self.timeout);
                return Err(Error::HandshakeTimeout(self.timeout));
            }
        };
        self.close(socket).await;
        outcome
    }

    /// Connects and waits for the token message. The socket is handed back
    /// open so closing it is not charged to the handshake timeout.
    async fn attempt(&self) -> Result<(HandshakeSocket, Result<String>)> {
        let request = self.handshake_request()?;
        let (mut socket, _response) = connect_async(request).await?;
        verbose!(self.verbose, "WebSocket connection opened");

        let outcome = self.read_token(&mut socket).await;
        Ok((socket, outcome))
    }

    async fn close(&self, mut socket: HandshakeSocket) {
        match timeout(self.timeout, socket.close(None)).await {
            Ok(Ok(())) => verbose!(self.verbose, "WebSocket connection closed"),
            Ok(Err(e)) => debug!("Ignoring error while closing handshake socket: {}", e),
            Err(_) => debug!("Gave up closing handshake socket after {:?}", self.timeout),
        }
    }

    fn handshake_request(&self) -> Result<Request> {
        let mut request = self.url.as_str().into_client_request()?;
        let key = HeaderValue::from_str(&Self::handshake_key())
            .map_err(|e| tungstenite::Error::HttpFormat(e.into()))?;

        let headers = request.headers_mut();
        headers.insert(CONNECTION, HeaderValue::from_static("Upgrade"));
        headers.insert(UPGRADE, HeaderValue::from_static("websocket"));
        headers.insert(SEC_WEBSOCKET_KEY, key);
        headers.insert(
            SEC_WEBSOCKET_VERSION,
            HeaderValue::from_static(WEBSOCKET_VERSION),
        );
        Ok(request)
    }

    /// Only the first data message counts. Control frames are not data.
    async fn read_token(&self, socket: &mut HandshakeSocket) -> Result<String> {
        while let Some(message) = socket.next().await {
            match message? {
                Message::Binary(payload) => {
                    verbose!(
                        self.verbose,
                        "WebSocket message received: {} bytes",
                        payload.len()
                    );
                    let token = Self::extract_token(&payload)?;
                    verbose!(self.verbose, "Token received: {}", token);
                    return Ok(token);
                }
                Message::Text(text) => {
                    verbose!(self.verbose, "WebSocket message received: {}", text);
                    return Err(Error::HandshakeProtocol(
                        "message expected to be buffer but was not".to_string(),
                    ));
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                Message::Close(frame) => {
                    debug!("Handshake socket closed by device: {:?}", frame);
                    break;
                }
            }
        }
        Err(Error::HandshakeProtocol(
            "connection closed before a token message arrived".to_string(),
        ))
    }

    /// Pulls the session token out of a binary handshake message.
    pub fn extract_token(payload: &[u8]) -> Result<String> {
        let envelope = Envelope::decode(payload).map_err(|e| {
            Error::HandshakeProtocol(format!(
                "message expected to contain a token but did not ({})",
                e
            ))
        })?;
        let header = envelope.header.ok_or_else(|| {
            Error::HandshakeProtocol("message expected to contain a header but did not".to_string())
        })?;
        match header.token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::HandshakeProtocol(
                "message expected to contain a token but did not".to_string(),
            )),
        }
    }
}
