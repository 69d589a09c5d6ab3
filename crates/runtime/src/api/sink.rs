//! Command sink abstraction and the HTTP implementation.
//!
//! The sink accepts two command shapes: a move to a normalized screen point
//! and a key press. It reports success or failure and nothing else.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::SinkError;

/// One command on the wire.
///
/// ```json
/// {"type":"move","x":0.42,"y":0.61}
/// {"type":"key","key":"space"}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkCommand {
    /// Normalized coordinates, both in `[0, 1]`.
    Move { x: f64, y: f64 },
    Key { key: String },
}

impl SinkCommand {
    pub fn key(key: impl Into<String>) -> Self {
        SinkCommand::Key { key: key.into() }
    }
}

/// External actuation channel.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Delivers one command to `endpoint`.
    async fn send(&self, endpoint: &str, command: &SinkCommand) -> Result<(), SinkError>;
}

/// POSTs commands as JSON. Any non-2xx response is a failure.
#[derive(Clone, Debug)]
pub struct HttpCommandSink {
    client: reqwest::Client,
}

impl HttpCommandSink {
    pub fn new() -> Result<Self, SinkError> {
        Ok(Self::with_client(reqwest::Client::builder().build()?))
    }

    /// Uses a preconfigured client (timeouts, proxies, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommandSink for HttpCommandSink {
    async fn send(&self, endpoint: &str, command: &SinkCommand) -> Result<(), SinkError> {
        let response = self.client.post(endpoint).json(command).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
