//! An in-process stand-in for an S-Play device.
//!
//! Serves the token handshake on `/` and the command API on `/api` from one
//! port, like the real hardware, and records what the client sent.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use splay_control_lib::util::envelope::Envelope;
use splay_control_lib::ClientConfig;
use tokio::net::TcpListener;

/// What the device pushes right after a WebSocket connects.
#[derive(Debug, Clone)]
pub enum Greeting {
    /// A well-formed envelope carrying this token.
    Token(String),
    /// A token envelope sent only after the delay has passed.
    Delayed(Duration, String),
    /// Arbitrary binary payload.
    Bytes(Vec<u8>),
    Text(String),
    /// Nothing at all; the socket stays open.
    Silent,
}

/// One request as the fake device received it.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

struct DeviceState {
    greeting: Greeting,
    reply: String,
    reply_delay: Duration,
    handshakes: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

pub struct FakeDevice {
    pub addr: SocketAddr,
    state: Arc<DeviceState>,
}

impl FakeDevice {
    pub async fn start(greeting: Greeting, reply: &str) -> Self {
        Self::start_with_delay(greeting, reply, Duration::ZERO).await
    }

    /// Like [`FakeDevice::start`], but every API answer is held back for `reply_delay`.
    pub async fn start_with_delay(greeting: Greeting, reply: &str, reply_delay: Duration) -> Self {
        init_logging();

        let state = Arc::new(DeviceState {
            greeting,
            reply: reply.to_string(),
            reply_delay,
            handshakes: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", get(handshake))
            .route("/api", post(api))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeDevice { addr, state }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new("127.0.0.1").with_port(self.addr.port())
    }

    pub fn handshakes(&self) -> usize {
        self.state.handshakes.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

async fn handshake(ws: WebSocketUpgrade, State(state): State<Arc<DeviceState>>) -> Response {
    state.handshakes.fetch_add(1, Ordering::SeqCst);
    ws.on_upgrade(move |socket| greet(socket, state))
}

async fn greet(mut socket: WebSocket, state: Arc<DeviceState>) {
    let greeting = match &state.greeting {
        Greeting::Token(token) => Some(Message::Binary(Envelope::with_token(token).encode())),
        Greeting::Delayed(delay, token) => {
            tokio::time::sleep(*delay).await;
            Some(Message::Binary(Envelope::with_token(token).encode()))
        }
        Greeting::Bytes(payload) => Some(Message::Binary(payload.clone().into())),
        Greeting::Text(text) => Some(Message::Text(text.as_str().into())),
        Greeting::Silent => None,
    };
    if let Some(message) = greeting {
        if socket.send(message).await.is_err() {
            return;
        }
    }

    // Hold the connection until the client hangs up.
    while let Some(Ok(message)) = socket.recv().await {
        if let Message::Close(_) = message {
            break;
        }
    }
}

async fn api(State(state): State<Arc<DeviceState>>, headers: HeaderMap, body: String) -> String {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        content_length: header(CONTENT_LENGTH),
        body,
    });

    if !state.reply_delay.is_zero() {
        tokio::time::sleep(state.reply_delay).await;
    }
    state.reply.clone()
}
