//! Wire envelope parsing
//!
//! The server pushes two frame shapes: the unnamed default event, and a
//! named `stock-notification` event whose payload repeats the event name in
//! a `type` discriminator. Both carry the same envelope. One dispatch keyed
//! by the event tag turns either shape into a uniform [`Batch`] - the merge
//! engine never sees which shape delivered it.

use serde::Deserialize;

use crate::error::StreamResult;
use crate::types::{Batch, ProductSnapshot};

/// Event name (and payload discriminator) of tagged stock pushes.
pub const STOCK_EVENT: &str = "stock-notification";

#[derive(Debug, Deserialize)]
struct Envelope {
    /// Payload discriminator carried by named events.
    #[serde(rename = "type", default)]
    kind: Option<String>,
    batch: BatchPayload,
}

#[derive(Debug, Deserialize)]
struct BatchPayload {
    #[serde(default)]
    data: Vec<ProductSnapshot>,
    #[serde(default)]
    datetime: String,
}

impl Envelope {
    fn into_batch(self) -> Batch {
        Batch::new(self.batch.data, self.batch.datetime)
    }
}

/// Parse one decoded frame into a batch.
///
/// Returns `Ok(None)` for frames this client does not consume: foreign
/// event names, and `stock-notification` frames whose discriminator does
/// not match. Malformed JSON is an error so the caller can log it; it must
/// never tear down the connection.
pub fn parse_frame(event: Option<&str>, data: &str) -> StreamResult<Option<Batch>> {
    match event {
        None | Some("message") => {
            let envelope: Envelope = serde_json::from_str(data)?;
            Ok(Some(envelope.into_batch()))
        }
        Some(STOCK_EVENT) => {
            let envelope: Envelope = serde_json::from_str(data)?;
            if envelope.kind.as_deref() == Some(STOCK_EVENT) {
                Ok(Some(envelope.into_batch()))
            } else {
                // Wrong discriminator: silently ignored, not an error.
                Ok(None)
            }
        }
        Some(_) => Ok(None),
    }
}
