use std::time::Duration;

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use tokio::time::timeout;

use crate::util::auth::TokenAcquirer;
use crate::util::config::ClientConfig;
use crate::util::error::{Error, Result};
use crate::util::traits::{Command, ResponseStatus, TaggedCommand};
use crate::util::verbose;

/// Sends commands to the device's HTTP API.
///
/// A dispatch without a token first runs a handshake through the
/// [`TokenAcquirer`]; tokens are not kept between dispatches.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    api_url: String,
    timeout: Duration,
    verbose: bool,
    acquirer: TokenAcquirer,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Dispatcher {
            client,
            api_url: config.api_url(),
            timeout: config.timeout,
            verbose: config.verbose,
            acquirer: TokenAcquirer::new(config),
        }
    }

    pub fn token_acquirer(&self) -> &TokenAcquirer {
        &self.acquirer
    }

    /// Sends `command` and deserializes the answer into its response type.
    pub async fn dispatch<C: Command>(&self, command: &C, token: Option<&str>) -> Result<C::Response> {
        let (object, body) = self.exchange(command, token).await?;
        serde_json::from_value(Value::Object(object)).map_err(|source| Error::UnexpectedResponse {
            command: C::TYPE,
            body,
            source,
        })
    }

    /// Like [`Dispatcher::dispatch`], but hands back the response object as parsed.
    pub async fn dispatch_value<C: Command>(
        &self,
        command: &C,
        token: Option<&str>,
    ) -> Result<Map<String, Value>> {
        self.exchange(command, token).await.map(|(object, _)| object)
    }

    async fn exchange<C: Command>(
        &self,
        command: &C,
        token: Option<&str>,
    ) -> Result<(Map<String, Value>, String)> {
        let token = match token {
            Some(token) => token.to_string(),
            None => self.acquirer.acquire().await?,
        };

        let payload = serde_json::to_string(&TaggedCommand::new(command)).map_err(|source| {
            Error::Serialize {
                command: C::TYPE,
                source,
            }
        })?;

        let body = match timeout(self.timeout, self.post(payload, &token)).await {
            Ok(body) => body?,
            Err(_) => {
                debug!("S-Play API request for {:?} timed out", C::TYPE);
                return Err(Error::DispatchTimeout(self.timeout));
            }
        };

        let object = interpret_response(&body)?;
        verbose!(self.verbose, "Parsed: {}", Value::Object(object.clone()));
        Ok((object, body))
    }

    async fn post(&self, payload: String, token: &str) -> Result<String> {
        verbose!(self.verbose, "Opening http API request to {}", self.api_url);
        let request = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, payload.len().to_string())
            .header(AUTHORIZATION, token);

        verbose!(self.verbose, "Writing data to http API request: {}", payload);
        let mut response = request.body(payload).send().await?;
        debug!("S-Play API answered with status {}", response.status());

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            verbose!(
                self.verbose,
                "Received http data chunk: {}",
                String::from_utf8_lossy(&chunk)
            );
            body.extend_from_slice(&chunk);
        }
        verbose!(self.verbose, "Received end of http data");

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Decides what a raw response body means.
///
/// Only a JSON object whose `result` is absent or `true` is a success.
pub fn interpret_response(body: &str) -> Result<Map<String, Value>> {
    let parsed: Value = serde_json::from_str(body).map_err(Error::ResponseParse)?;
    let object = match parsed {
        Value::Object(object) => object,
        _ => {
            return Err(Error::ResponseFormat {
                body: body.to_string(),
            })
        }
    };

    match ResponseStatus::of(&object) {
        ResponseStatus::Success => Ok(object),
        ResponseStatus::Failure { error: Some(error) } => Err(Error::DeviceReported(error)),
        ResponseStatus::Failure { error: None } => Err(Error::UnknownDeviceFailure {
            body: body.to_string(),
        }),
    }
}
