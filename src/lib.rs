//! Stock Notify
//!
//! A resilient live-update consumer: follows a server-pushed SSE stream of
//! product stock snapshots, survives disconnects with bounded deterministic
//! backoff, detects silent failures via a periodic liveness check and a
//! host-visibility hook, and folds incoming batches into a bounded, ordered,
//! read/unread notification list with at most one entry per product.
//!
//! # Features
//!
//! - **One supervised stream**: connect, detect failure, reconnect with
//!   capped multiplicative backoff (1s base, 1.5x growth, 30s cap, 10
//!   automatic attempts), then a terminal failed state only a manual
//!   reconnect leaves
//! - **Merge semantics**: stock changes move an entry to the front and
//!   reset its read flag; metadata-only refreshes mutate in place
//! - **Nothing throws**: transport failures become status values, malformed
//!   payloads are logged and dropped
//! - **Pluggable transport**: production SSE over reqwest, scripted streams
//!   in tests
//!
//! # Modules
//!
//! - `types`: core data structures (ProductSnapshot, Notification, Batch)
//! - `notifications`: the bounded ordered list and its merge rules
//! - `stream`: SSE decoding, envelope parsing, transport seam, backoff,
//!   and the supervision task
//! - `client`: the `StockNotifier` facade hosts talk to
//! - `config`: endpoint, credential and tuning knobs, loadable from env
//! - `error`: internal error types
//!
//! # Example
//!
//! ```no_run
//! use stock_notify::{StockNotifier, StreamConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StreamConfig::new("https://example.test/api/notifications/stream");
//!     let notifier = StockNotifier::start(config);
//!
//!     // ... the UI reads these on every render:
//!     let _items = notifier.notifications();
//!     let _badge = notifier.unread_count();
//!     let _status = notifier.status_text();
//!
//!     notifier.shutdown().await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod notifications;
pub mod stream;
pub mod types;

// Re-export commonly used items at crate root
pub use client::StockNotifier;
pub use config::StreamConfig;
pub use error::{StreamError, StreamResult};
pub use notifications::{NotificationList, MAX_NOTIFICATIONS};
pub use stream::transport::{EventStream, SseTransport, Transport, TransportEvent};
pub use stream::{ConnectionState, ConnectionStatus};
pub use types::{Batch, Notification, ProductSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
