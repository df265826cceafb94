use std::time::Duration;

/// Port the device serves both the WebSocket handshake and the HTTP API on.
pub const DEFAULT_PORT: u16 = 55555;

/// Applied separately to the handshake and to each API request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Where the device lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Surfaces the step-by-step protocol log at `info` instead of `debug`.
    pub verbose: bool,
}

impl ClientConfig {
    pub fn new(host: &str) -> Self {
        ClientConfig {
            host: host.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn handshake_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }

    pub fn api_url(&self) -> String {
        format!("http://{}:{}/api", self.host, self.port)
    }
}
