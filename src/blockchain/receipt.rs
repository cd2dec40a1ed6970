//! Conversion of RPC receipts into the pipeline's event-log view.
//!
//! Every log keeps its position in the transaction, including logs emitted by
//! contracts other than the one called. Logs that match none of the known
//! events become `Unknown` entries so later ordinals do not shift.

use alloy::rpc::types::{Log, TransactionReceipt as RpcReceipt};

use crate::blockchain::contracts::{ICollectionFactory, OwnershipTransferred, Transfer};
use crate::pipeline::types::{Event, TransactionReceipt};

/// Name given to logs none of the bindings decode.
pub const UNKNOWN_EVENT: &str = "Unknown";

/// Decode a single log at position `index`.
pub fn decode_event(index: usize, log: &Log) -> Event {
    if let Ok(decoded) = log.log_decode::<ICollectionFactory::CollectionCreated>() {
        let data = &decoded.inner.data;
        return Event::new(index, "CollectionCreated")
            .with_arg("owner", data.owner.to_string())
            .with_arg("collectionAddress", data.collectionAddress.to_string());
    }
    if let Ok(decoded) = log.log_decode::<OwnershipTransferred>() {
        let data = &decoded.inner.data;
        return Event::new(index, "OwnershipTransferred")
            .with_arg("previousOwner", data.previousOwner.to_string())
            .with_arg("newOwner", data.newOwner.to_string());
    }
    if let Ok(decoded) = log.log_decode::<Transfer>() {
        let data = &decoded.inner.data;
        return Event::new(index, "Transfer")
            .with_arg("from", data.from.to_string())
            .with_arg("to", data.to.to_string())
            .with_arg("tokenId", data.tokenId.to_string());
    }

    let mut event = Event::new(index, UNKNOWN_EVENT);
    if let Some(topic0) = log.inner.data.topics().first() {
        event = event.with_arg("topic0", topic0.to_string());
    }
    event
}

/// Decode an ordered list of logs.
pub fn decode_events(logs: &[Log]) -> Vec<Event> {
    logs.iter()
        .enumerate()
        .map(|(index, log)| decode_event(index, log))
        .collect()
}

/// Build the pipeline receipt from an RPC receipt.
pub fn from_rpc_receipt(receipt: &RpcReceipt) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        event_log: decode_events(receipt.inner.logs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, LogData, B256, U256};
    use alloy::sol_types::SolEvent;

    fn rpc_log(data: LogData) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0xfa),
                data,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_decodes_collection_deployment_order() {
        let owner = Address::repeat_byte(0x01);
        let collection = Address::repeat_byte(0x02);
        let logs = vec![
            rpc_log(
                OwnershipTransferred {
                    previousOwner: Address::ZERO,
                    newOwner: Address::repeat_byte(0xfa),
                }
                .encode_log_data(),
            ),
            rpc_log(
                OwnershipTransferred {
                    previousOwner: Address::repeat_byte(0xfa),
                    newOwner: owner,
                }
                .encode_log_data(),
            ),
            rpc_log(
                ICollectionFactory::CollectionCreated {
                    owner,
                    collectionAddress: collection,
                }
                .encode_log_data(),
            ),
        ];

        let events = decode_events(&logs);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].name, "OwnershipTransferred");
        assert_eq!(events[1].arg("newOwner"), Some(owner.to_string().as_str()));
        assert_eq!(events[2].index, 2);
        assert_eq!(events[2].name, "CollectionCreated");
        assert_eq!(
            events[2].arg("collectionAddress"),
            Some(collection.to_string().as_str())
        );
    }

    #[test]
    fn test_decodes_nft_transfer() {
        let log = rpc_log(
            Transfer {
                from: Address::ZERO,
                to: Address::repeat_byte(0x03),
                tokenId: U256::from(7),
            }
            .encode_log_data(),
        );
        let event = decode_event(0, &log);
        assert_eq!(event.name, "Transfer");
        assert_eq!(event.arg("tokenId"), Some("7"));
    }

    #[test]
    fn test_unknown_log_keeps_position() {
        let topic = B256::repeat_byte(0x42);
        let log = rpc_log(LogData::new_unchecked(vec![topic], Default::default()));

        let events = decode_events(&[log.clone(), log]);
        assert_eq!(events[1].index, 1);
        assert_eq!(events[1].name, UNKNOWN_EVENT);
        assert_eq!(events[1].arg("topic0"), Some(topic.to_string().as_str()));
    }
}
