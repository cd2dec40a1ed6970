//! Result extraction from confirmed receipts.
//!
//! The collection factory's deployment emits its events in a fixed order: the
//! new collection's ownership transfers come first and `CollectionCreated`
//! third. Extraction reads that position directly rather than searching for a
//! matching event; a redeployed factory with a different emission order only
//! needs [`COLLECTION_CREATED`] updated.

use crate::pipeline::types::{MintError, MintResult, TransactionReceipt};

/// A fixed position in a receipt's event log and the argument read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLocator {
    /// Zero-based position in the log.
    pub ordinal: usize,
    pub field: &'static str,
}

/// Where `createCollection` reports the deployed collection.
pub const COLLECTION_CREATED: EventLocator = EventLocator {
    ordinal: 2,
    field: "collectionAddress",
};

impl EventLocator {
    /// Read the located argument from `receipt`.
    pub fn read<'r>(&self, receipt: &'r TransactionReceipt) -> MintResult<&'r str> {
        receipt
            .event_log
            .get(self.ordinal)
            .and_then(|event| event.arg(self.field))
            .ok_or(MintError::MissingExpectedEvent {
                ordinal: self.ordinal,
                field: self.field,
            })
    }
}

/// Address of the collection deployed by a `createCollection` transaction.
pub fn extract_collection_address(receipt: &TransactionReceipt) -> MintResult<String> {
    COLLECTION_CREATED.read(receipt).map(str::to_string)
}

/// The mint flow only needs the confirmed receipt itself.
pub fn extract_mint_confirmation(receipt: TransactionReceipt) -> TransactionReceipt {
    receipt
}
