//! Batch of snapshots delivered by one push

use serde::{Deserialize, Serialize};

use super::ProductSnapshot;

/// One pushed message: zero or more product snapshots plus the batch time.
///
/// Produced by the protocol layer from either accepted wire shape, so the
/// merge engine only ever sees this uniform value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Batch {
    /// Snapshots in server order.
    pub products: Vec<ProductSnapshot>,

    /// Server-side batch timestamp, carried verbatim.
    pub datetime: String,
}

impl Batch {
    pub fn new(products: Vec<ProductSnapshot>, datetime: impl Into<String>) -> Self {
        Self {
            products,
            datetime: datetime.into(),
        }
    }

    /// A batch with no snapshots is a merge no-op.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
