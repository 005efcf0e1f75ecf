//! Live update stream
//!
//! Everything between the wire and the notification list:
//!
//! - `sse`: incremental `text/event-stream` frame decoding
//! - `protocol`: tagged envelope parsing into uniform batches
//! - `transport`: the seam the manager opens streams through
//! - `backoff`: the deterministic reconnect schedule
//! - `manager`: the supervision task that ties them together

pub mod backoff;
pub(crate) mod manager;
pub mod protocol;
pub mod sse;
pub mod transport;

use std::fmt;
use std::time::Duration;

/// Lifecycle state of the stream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection and none pending.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// The stream is live.
    Connected,
    /// Connection lost; a retry is scheduled.
    Reconnecting,
    /// Automatic retries exhausted; only a manual reconnect recovers.
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Snapshot of the connection's health, published on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,

    /// Number of the automatic retry currently scheduled or in flight;
    /// 0 after any successful connect.
    pub reconnect_attempt: u32,

    /// Wait before the scheduled retry, present while reconnecting.
    pub retry_in: Option<Duration>,
}

impl ConnectionStatus {
    pub fn disconnected() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_attempt: 0,
            retry_in: None,
        }
    }

    /// Human-readable status line for UI surfaces.
    pub fn describe(&self) -> String {
        match self.state {
            ConnectionState::Disconnected => "disconnected".to_string(),
            ConnectionState::Connecting => "connecting to live updates".to_string(),
            ConnectionState::Connected => "live updates connected".to_string(),
            ConnectionState::Reconnecting => {
                let wait = self.retry_in.unwrap_or_default();
                let secs = wait.as_secs_f64().round() as u64;
                format!(
                    "connection lost, retrying in {}s (attempt {})",
                    secs, self.reconnect_attempt
                )
            }
            ConnectionState::Failed => {
                "connection failed after repeated attempts; manual reconnect required".to_string()
            }
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
