use crate::{
    error::Error,
    ether::provider::{SandboxProvider, SandboxReceipt},
    utils::hex::ToLowerHex,
};
use alloy::{primitives::TxHash, rpc::types::TransactionReceipt};
use futures::StreamExt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Wait until the given transaction has a receipt, polling the standard
/// receipt lookup on every new block.
///
/// Resolves exactly once: with the receipt as soon as a poll returns one (the
/// block filter is dropped first), or with the first poll error. There is no
/// timeout; a transaction that is never mined keeps the wait suspended.
///
/// ```no_run
/// use crucible_common::ether::rpc::wait_for_receipt;
///
/// // let provider = SandboxProvider::connect("http://localhost:8545").await?;
/// // let receipt = wait_for_receipt(&provider, "0x...").await?;
/// ```
pub async fn wait_for_receipt(
    provider: &SandboxProvider,
    transaction_hash: &str,
) -> Result<TransactionReceipt, Error> {
    let tx_hash = parse_tx_hash(transaction_hash)?;

    let mut blocks = provider
        .watch_blocks()
        .await
        .map_err(|e| Error::RpcError(format!("failed to watch blocks: {e}")))?;

    while let Some(hashes) = blocks.next().await {
        trace!(
            "{} new block(s), polling receipt for transaction '{}'",
            hashes.len(),
            tx_hash.to_lower_hex()
        );

        if let Some(receipt) = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| Error::RpcError(format!("failed to get transaction receipt: {e}")))?
        {
            debug!("got receipt for transaction '{}'", tx_hash.to_lower_hex());
            return Ok(receipt);
        }
    }

    Err(Error::RpcError("block stream closed before a receipt was found".to_string()))
}

/// Wait until the given transaction has a sandbox receipt, polling the
/// sandbox-specific lookup on every new block.
///
/// Identical to [`wait_for_receipt`] except for the lookup used, and like it
/// resolves exactly once with no timeout.
pub async fn wait_for_sandbox_receipt(
    provider: &SandboxProvider,
    transaction_hash: &str,
) -> Result<SandboxReceipt, Error> {
    let tx_hash = parse_tx_hash(transaction_hash)?;

    let mut blocks = provider
        .watch_blocks()
        .await
        .map_err(|e| Error::RpcError(format!("failed to watch blocks: {e}")))?;

    while let Some(hashes) = blocks.next().await {
        trace!(
            "{} new block(s), polling sandbox receipt for transaction '{}'",
            hashes.len(),
            tx_hash.to_lower_hex()
        );

        if let Some(receipt) = provider
            .sandbox_receipt(tx_hash)
            .await
            .map_err(|e| Error::RpcError(format!("failed to get sandbox receipt: {e}")))?
        {
            debug!("got sandbox receipt for transaction '{}'", tx_hash.to_lower_hex());
            return Ok(receipt);
        }
    }

    Err(Error::RpcError("block stream closed before a receipt was found".to_string()))
}

fn parse_tx_hash(transaction_hash: &str) -> Result<TxHash, Error> {
    TxHash::from_str(transaction_hash).map_err(|_| {
        Error::ParseError(format!("failed to parse transaction hash '{}'", transaction_hash))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tx_hash_valid() {
        let hash = parse_tx_hash("0xc699c1e8c7d4ed9b7b8801e8e79defba4b03b795878a3ba7e3752766182b1b36")
            .expect("failed to parse hash");
        assert_eq!(
            hash.to_lower_hex(),
            "0xc699c1e8c7d4ed9b7b8801e8e79defba4b03b795878a3ba7e3752766182b1b36"
        );
    }

    #[test]
    fn test_parse_tx_hash_invalid() {
        assert!(parse_tx_hash("0xdeadbeef").is_err());
    }
}
