use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::ChannelError;

/// One inbound frame from the search backend: a line of JSON text.
pub type Frame = String;

/// The streaming channel to the search collaborator.
///
/// `open` transmits the query as the sole outbound payload and returns the
/// inbound side. The channel closes when either end lets go: the backend
/// finishing (or failing) drops the sender, and dropping the receiver stops
/// the transport, so an abandoned session cannot leak a connection.
#[async_trait]
pub trait SearchChannel: Send + Sync {
    /// Opens the channel and sends the query.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError` if the connection cannot be established.
    async fn open(&self, query: &str) -> Result<mpsc::Receiver<Frame>, ChannelError>;
}

/// HTTP streaming implementation of [`SearchChannel`].
///
/// Posts the query once and reads newline-delimited JSON events off the
/// response body until the backend closes the stream.
pub struct HttpSearchChannel {
    client: Client,
    config: BackendConfig,
}

impl HttpSearchChannel {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }
}

#[async_trait]
impl SearchChannel for HttpSearchChannel {
    async fn open(&self, query: &str) -> Result<mpsc::Receiver<Frame>, ChannelError> {
        let url = self.config.endpoint("search");
        let response = self
            .client
            .post(url)
            .body(query.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChannelError::HttpStatus(response.status()));
        }

        debug!(query, "search channel open");
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = stream.next().await {
                let Ok(chunk) = chunk else {
                    // Transport died mid-stream; dropping the sender tells
                    // the session the channel closed without a terminal.
                    return;
                };
                buf.extend_from_slice(&chunk);
                while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buf.drain(..=pos).collect();
                    let frame = String::from_utf8_lossy(&line).trim().to_string();
                    if frame.is_empty() {
                        continue;
                    }
                    if tx.send(frame).await.is_err() {
                        // Receiver dropped (abort or teardown); stop reading.
                        return;
                    }
                }
            }
            // Flush a final frame that arrived without a trailing newline.
            let tail = String::from_utf8_lossy(&buf).trim().to_string();
            if !tail.is_empty() {
                let _ = tx.send(tail).await;
            }
            debug!("search channel drained");
        });

        Ok(rx)
    }
}
