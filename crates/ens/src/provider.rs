//! The chain access the name service needs, and its implementation on top of an alloy
//! [`Provider`].

use crate::error::ContractCallError;
use alloy_primitives::{Address, B256, Bytes, TxHash, b256};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockNumberOrTag, TransactionRequest};
use async_trait::async_trait;
use std::{fmt, sync::Arc};

/// Label reported for any chain that is not one of the well-known public networks.
pub const PRIVATE_NETWORK: &str = "private";

/// Well-known networks, identified by their genesis hash and chain id.
const NETWORKS: [(B256, u64, &str); 8] = [
    (b256!("0xd4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3"), 1, "main"),
    (b256!("0x0cd786a2425d16f152c658316c423e6ce1181e15c3295826d7c9904cba9ce303"), 2, "morden"),
    (b256!("0x41941023680923e0fe4d74a34bdac8141f2540e3ae90623718e47d66d1ca4a2d"), 3, "ropsten"),
    (b256!("0x6341fd3daf94b748c72ced5a5b26028f2474f5f00d824504e4fa37a75767e177"), 4, "rinkeby"),
    (b256!("0xbf7e331f7f7c1dd2e05159666b3bf8bc7a8a3a9eb1d518969eab529dd9b88c1a"), 5, "goerli"),
    (b256!("0xa3c565fc15c7478862d50ccd6561e3c06b24cc509bf388941c25ea985ce32cb9"), 42, "kovan"),
    (b256!("0xb5f7f912443c940f21fd611f12828d75b534364ed9e95ca4e307729a4661bde4"), 17000, "holesky"),
    (
        b256!("0x25a5cc106eea7138acab33231d7160d69cb777ee0c2c553fcddf5138993e6dd9"),
        11155111,
        "sepolia",
    ),
];

/// Read and write access to a chain: the block and network queries used to validate the
/// connection, and raw calls used by [`ContractHandle`](crate::ContractHandle).
#[async_trait]
pub trait ChainClient: fmt::Debug + Send + Sync {
    /// Returns the timestamp of the latest block, in seconds since the unix epoch.
    async fn latest_block_timestamp(&self) -> Result<u64, ContractCallError>;

    /// Returns the label of the connected network, e.g. `main` or `sepolia`.
    async fn network_type(&self) -> Result<String, ContractCallError>;

    /// Executes a read-only call against `to`.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ContractCallError>;

    /// Submits a transaction to `to` and returns its hash without waiting for inclusion.
    async fn send_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, ContractCallError>;
}

/// Returns the network label for the given genesis hash and chain id.
///
/// A chain is only recognized if both values match; forks of public networks that kept the
/// genesis block but changed the chain id are reported as [`PRIVATE_NETWORK`].
pub fn network_type(genesis_hash: B256, chain_id: u64) -> &'static str {
    NETWORKS
        .iter()
        .find(|(genesis, id, _)| *genesis == genesis_hash && *id == chain_id)
        .map_or(PRIVATE_NETWORK, |&(_, _, label)| label)
}

/// A [`ChainClient`] backed by an alloy [`Provider`].
#[derive(Clone)]
pub struct RpcClient<P> {
    provider: P,
}

impl<P> RpcClient<P> {
    /// Creates a new client from the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider + 'static> RpcClient<P> {
    /// Wraps the provider into a shareable [`ChainClient`].
    pub fn shared(provider: P) -> Arc<dyn ChainClient> {
        Arc::new(Self::new(provider))
    }

    async fn genesis_hash(&self) -> Result<B256, ContractCallError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Earliest)
            .await
            .map_err(ContractCallError::transport)?;
        Ok(block.map(|block| block.header.hash).unwrap_or_default())
    }
}

impl<P> fmt::Debug for RpcClient<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: Provider + 'static> ChainClient for RpcClient<P> {
    async fn latest_block_timestamp(&self) -> Result<u64, ContractCallError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(ContractCallError::transport)?;
        // A node without any block has certainly not synced.
        Ok(block.map(|block| block.header.timestamp).unwrap_or_default())
    }

    async fn network_type(&self) -> Result<String, ContractCallError> {
        let genesis_hash = self.genesis_hash().await?;
        let chain_id = self.provider.get_chain_id().await.map_err(ContractCallError::transport)?;
        Ok(network_type(genesis_hash, chain_id).to_string())
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ContractCallError> {
        let tx = TransactionRequest::default().to(to).input(input.into());
        self.provider.call(tx).await.map_err(ContractCallError::transport)
    }

    async fn send_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, ContractCallError> {
        let tx = TransactionRequest::default().to(to).input(input.into());
        let pending =
            self.provider.send_transaction(tx).await.map_err(ContractCallError::transport)?;
        Ok(*pending.tx_hash())
    }
}
