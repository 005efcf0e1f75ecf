//! Transport seam between the connection manager and the wire
//!
//! The manager supervises exactly one [`EventStream`] at a time and never
//! touches the network directly. Production code plugs in [`SseTransport`];
//! tests plug in scripted streams.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use reqwest::header;

use crate::config::StreamConfig;
use crate::stream::sse::FrameDecoder;

/// Event emitted by an open transport stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The underlying connection is established and healthy.
    Opened,

    /// One decoded server-sent frame.
    Message {
        /// Event name, absent for default events.
        event: Option<String>,
        /// Raw frame payload.
        data: String,
    },

    /// The connection failed; the stream ends after this.
    Failed {
        /// Human-readable cause, surfaced in logs and status.
        reason: String,
    },
}

/// A live transport subscription. Ends on failure or server close.
pub type EventStream = Pin<Box<dyn Stream<Item = TransportEvent> + Send>>;

/// Source of live-update streams.
///
/// `open` must return immediately: the connect handshake happens inside the
/// returned stream, which yields [`TransportEvent::Opened`] once the server
/// accepts. Dropping the stream closes the connection.
pub trait Transport: Send + Sync {
    fn open(&self) -> EventStream;
}

/// Production SSE transport over HTTP.
///
/// Issues a long-lived GET with `Accept: text/event-stream` and the
/// configured API key in the `X-API-Key` header, then decodes the response
/// body incrementally.
pub struct SseTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl SseTransport {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

impl Transport for SseTransport {
    fn open(&self) -> EventStream {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();

        Box::pin(async_stream::stream! {
            let mut request = client
                .get(&endpoint)
                .header(header::ACCEPT, "text/event-stream");
            if let Some(ref key) = api_key {
                request = request.header("X-API-Key", key);
            }

            match request.send().await {
                Err(err) => {
                    yield TransportEvent::Failed {
                        reason: err.to_string(),
                    };
                }
                Ok(response) if !response.status().is_success() => {
                    yield TransportEvent::Failed {
                        reason: format!("server answered {}", response.status()),
                    };
                }
                Ok(response) => {
                    yield TransportEvent::Opened;

                    let mut decoder = FrameDecoder::new();
                    let mut body = response.bytes_stream();
                    let mut wire_error = None;
                    while let Some(chunk) = body.next().await {
                        match chunk {
                            Ok(bytes) => {
                                for frame in decoder.feed(&bytes) {
                                    yield TransportEvent::Message {
                                        event: frame.event,
                                        data: frame.data,
                                    };
                                }
                            }
                            Err(err) => {
                                wire_error = Some(err.to_string());
                                break;
                            }
                        }
                    }

                    // A server that ends the response cleanly still means
                    // the subscription is gone.
                    yield TransportEvent::Failed {
                        reason: wire_error
                            .unwrap_or_else(|| "stream closed by server".to_string()),
                    };
                }
            }
        })
    }
}
