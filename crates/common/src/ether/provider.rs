//! A thin wrapper around an RPC provider, exposing the handful of calls the
//! sandbox helpers need.
use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash, B256, U256, U64},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{Log, TransactionReceipt},
};
use eyre::Result;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// [`SandboxProvider`] wraps a [`Provider`] connected to a sandbox node,
/// adding the sandbox-specific receipt lookup next to the standard one.
#[derive(Clone, Debug)]
pub struct SandboxProvider {
    provider: RootProvider<Ethereum>,
}

// The transport is picked from the url scheme: http(s), ws(s), or a file path for ipc.
impl SandboxProvider {
    /// Connect to a provider using the given rpc_url.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        if rpc_url.is_empty() {
            return Err(eyre::eyre!("No RPC URL provided"));
        }

        let provider = ProviderBuilder::new().connect(rpc_url).await?.root().clone();
        Ok(Self { provider })
    }

    /// Get the receipt of the given transaction, if it has been mined.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionReceipt>> {
        Ok(self.provider.get_transaction_receipt(tx_hash).await?)
    }

    /// Get the sandbox's extended receipt of the given transaction, if it has
    /// been mined. Issued as a raw `sandbox_receipt` call, which only sandbox
    /// nodes serve.
    pub async fn sandbox_receipt(&self, tx_hash: TxHash) -> Result<Option<SandboxReceipt>> {
        Ok(self.provider.raw_request("sandbox_receipt".into(), (tx_hash,)).await?)
    }

    /// Install a filter on latest blocks and return the polling stream of new
    /// block hashes. Dropping the stream uninstalls the filter.
    pub async fn watch_blocks(&self) -> Result<impl Stream<Item = Vec<B256>> + Unpin> {
        Ok(self.provider.watch_blocks().await?.into_stream())
    }
}

/// The receipt structure returned by a sandbox node's `sandbox_receipt` call.
/// Mirrors a standard receipt, with the sandbox's execution outcome attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxReceipt {
    /// Hash of the transaction this receipt confirms.
    pub transaction_hash: B256,
    /// Index of the transaction within its block.
    pub transaction_index: Option<U64>,
    /// Hash of the block the transaction was included in.
    pub block_hash: Option<B256>,
    /// Number of the block the transaction was included in.
    pub block_number: Option<U64>,
    /// Total gas used by the block up to and including this transaction.
    pub cumulative_gas_used: Option<U256>,
    /// Gas used by this transaction alone.
    pub gas_used: Option<U256>,
    /// Address of the deployed contract, for contract-creation transactions.
    pub contract_address: Option<Address>,
    /// Logs emitted during execution.
    #[serde(default)]
    pub logs: Vec<Log>,
    /// Raw return value of the call, as reported by the sandbox.
    pub return_value: Option<Bytes>,
    /// Human-readable VM exception, if execution aborted.
    pub exception: Option<String>,
}
