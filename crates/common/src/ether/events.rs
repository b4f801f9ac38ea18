//! Decoding of raw event logs against a contract ABI.
use std::collections::VecDeque;

use alloy::primitives::LogData;
use alloy_dyn_abi::{DynSolValue, EventExt};
use alloy_json_abi::JsonAbi;
use tracing::trace;

use crate::{error::Error, utils::hex::ToLowerHex};

/// An event log decoded against its ABI definition.
#[derive(Debug, Clone)]
pub struct DecodedEventLog {
    /// The name of the event. For example, `Transfer`.
    pub name: String,
    /// The event signature. For example, `Transfer(address,address,uint256)`.
    pub signature: String,
    /// Decoded parameter values, keyed by name, in declaration order.
    /// Indexed parameters are decoded from topics, the rest from data.
    pub params: Vec<(String, DynSolValue)>,
}

impl DecodedEventLog {
    /// Look up a decoded parameter by name.
    pub fn param(&self, name: &str) -> Option<&DynSolValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, value)| value)
    }
}

/// Decode a raw event log against a contract ABI.
///
/// Scans the ABI's events for the first one whose signature hash equals the
/// log's first topic and decodes the log with that definition. Returns
/// `Ok(None)` when no event matches (or the log carries no topics); a log
/// that matches an event but fails to decode against it is an error.
///
/// ```
/// use alloy::primitives::LogData;
/// use alloy_json_abi::JsonAbi;
/// use crucible_common::ether::events::parse_event_log;
///
/// let abi: JsonAbi = serde_json::from_str(r#"[{
///     "type": "event", "name": "Ping", "inputs": [], "anonymous": false
/// }]"#).expect("invalid abi");
///
/// let selector = abi.events().next().expect("no events").selector();
/// let log = LogData::new_unchecked(vec![selector], Default::default());
///
/// let decoded = parse_event_log(&abi, &log).expect("decode failed").expect("no match");
/// assert_eq!(decoded.name, "Ping");
/// ```
pub fn parse_event_log(abi: &JsonAbi, log: &LogData) -> Result<Option<DecodedEventLog>, Error> {
    let topic0 = match log.topics().first() {
        Some(topic) => *topic,
        None => return Ok(None),
    };

    for event in abi.events() {
        if event.selector() != topic0 {
            continue;
        }

        trace!(
            "decoding log with topic '{}' as event '{}'",
            topic0.to_lower_hex(),
            event.signature()
        );

        let decoded = event
            .decode_log_parts(log.topics().iter().copied(), &log.data)
            .map_err(|e| Error::Eyre(eyre::eyre!("failed to decode event log: {e}")))?;

        // reassemble declaration order from the indexed/body split
        let mut indexed = VecDeque::from(decoded.indexed);
        let mut body = VecDeque::from(decoded.body);

        let mut params = Vec::with_capacity(event.inputs.len());
        for input in &event.inputs {
            let queue = if input.indexed { &mut indexed } else { &mut body };
            let value = queue.pop_front().ok_or_else(|| {
                Error::Generic(format!("missing decoded value for parameter '{}'", input.name))
            })?;
            params.push((input.name.clone(), value));
        }

        return Ok(Some(DecodedEventLog {
            name: event.name.clone(),
            signature: event.signature(),
            params,
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{b256, Address, Bytes, B256, U256};

    const TRANSFER_ABI: &str = r#"[
        {
            "type": "event",
            "name": "Transfer",
            "inputs": [
                { "name": "from", "type": "address", "indexed": true },
                { "name": "to", "type": "address", "indexed": true },
                { "name": "value", "type": "uint256", "indexed": false }
            ],
            "anonymous": false
        },
        {
            "type": "event",
            "name": "Approval",
            "inputs": [
                { "name": "owner", "type": "address", "indexed": true },
                { "name": "spender", "type": "address", "indexed": true },
                { "name": "value", "type": "uint256", "indexed": false }
            ],
            "anonymous": false
        },
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "value", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }],
            "stateMutability": "nonpayable"
        }
    ]"#;

    fn transfer_log(from: Address, to: Address, value: U256) -> LogData {
        LogData::new_unchecked(
            vec![
                // keccak256("Transfer(address,address,uint256)")
                b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"),
                B256::left_padding_from(from.as_slice()),
                B256::left_padding_from(to.as_slice()),
            ],
            Bytes::from(B256::from(value).to_vec()),
        )
    }

    #[test]
    fn test_parse_event_log_decodes_all_parameters() {
        let abi: JsonAbi = serde_json::from_str(TRANSFER_ABI).expect("invalid abi");
        let from = Address::repeat_byte(0x11);
        let to = Address::repeat_byte(0x22);
        let log = transfer_log(from, to, U256::from(100));

        let decoded =
            parse_event_log(&abi, &log).expect("decode failed").expect("no matching event");

        assert_eq!(decoded.name, "Transfer");
        assert_eq!(decoded.signature, "Transfer(address,address,uint256)");
        assert_eq!(
            decoded.params.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
            vec!["from", "to", "value"]
        );
        assert_eq!(decoded.param("from"), Some(&DynSolValue::Address(from)));
        assert_eq!(decoded.param("to"), Some(&DynSolValue::Address(to)));
        assert_eq!(decoded.param("value"), Some(&DynSolValue::Uint(U256::from(100), 256)));
    }

    #[test]
    fn test_parse_event_log_no_matching_event() {
        let abi: JsonAbi = serde_json::from_str(TRANSFER_ABI).expect("invalid abi");
        let log = LogData::new_unchecked(
            vec![b256!("c699c1e8c7d4ed9b7b8801e8e79defba4b03b795878a3ba7e3752766182b1b36")],
            Bytes::new(),
        );

        assert!(parse_event_log(&abi, &log).expect("decode failed").is_none());
    }

    #[test]
    fn test_parse_event_log_no_topics() {
        let abi: JsonAbi = serde_json::from_str(TRANSFER_ABI).expect("invalid abi");
        let log = LogData::new_unchecked(vec![], Bytes::new());

        assert!(parse_event_log(&abi, &log).expect("decode failed").is_none());
    }

    #[test]
    fn test_parse_event_log_selects_event_by_topic() {
        let abi: JsonAbi = serde_json::from_str(TRANSFER_ABI).expect("invalid abi");
        let approval = abi.events().find(|e| e.name == "Approval").expect("missing event");
        let log = LogData::new_unchecked(
            vec![
                approval.selector(),
                B256::left_padding_from(Address::repeat_byte(0x33).as_slice()),
                B256::left_padding_from(Address::repeat_byte(0x44).as_slice()),
            ],
            Bytes::from(B256::from(U256::from(7)).to_vec()),
        );

        let decoded =
            parse_event_log(&abi, &log).expect("decode failed").expect("no matching event");
        assert_eq!(decoded.name, "Approval");
        assert_eq!(decoded.param("value"), Some(&DynSolValue::Uint(U256::from(7), 256)));
    }
}
