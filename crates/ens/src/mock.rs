//! An in-memory [`ChainClient`] for tests.

use crate::{config::ENS_REGISTRY, error::ContractCallError, provider::ChainClient};
use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes, TxHash, keccak256};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

pub(crate) const MAINNET_REGISTRY: Address = ENS_REGISTRY;

#[derive(Debug, thiserror::Error)]
#[error("execution reverted")]
pub(crate) struct Reverted;

/// A chain whose head age, network label and call results are set by the test.
#[derive(Debug)]
pub(crate) struct MockClient {
    head_age: u64,
    network: String,
    responses: Mutex<HashMap<(Address, Bytes), Bytes>>,
    calls: Mutex<Vec<(Address, Bytes)>>,
    sent: Mutex<Vec<(Address, Bytes)>>,
    block_calls: AtomicUsize,
    network_type_calls: AtomicUsize,
}

impl MockClient {
    /// A synced mainnet node.
    pub(crate) fn new() -> Self {
        Self {
            head_age: 12,
            network: "main".to_string(),
            responses: Default::default(),
            calls: Default::default(),
            sent: Default::default(),
            block_calls: AtomicUsize::new(0),
            network_type_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_head_age(mut self, head_age: u64) -> Self {
        self.head_age = head_age;
        self
    }

    pub(crate) fn with_network(mut self, network: &str) -> Self {
        self.network = network.to_string();
        self
    }

    /// Makes a call of `sig` with `args` on `to` return `outputs`.
    pub(crate) fn on_call(
        &self,
        to: Address,
        sig: &str,
        args: &[DynSolValue],
        outputs: &[DynSolValue],
    ) {
        let input = Self::calldata(sig, args);
        let output = DynSolValue::Tuple(outputs.to_vec()).abi_encode_params();
        self.responses.lock().insert((to, input), output.into());
    }

    /// ABI-encodes a call of `sig` with `args`.
    pub(crate) fn calldata(sig: &str, args: &[DynSolValue]) -> Bytes {
        let function = Function::parse(sig).unwrap();
        function.abi_encode_input(args).unwrap().into()
    }

    /// All read-only calls made so far.
    pub(crate) fn calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().clone()
    }

    /// All transactions submitted so far.
    pub(crate) fn sent(&self) -> Vec<(Address, Bytes)> {
        self.sent.lock().clone()
    }

    pub(crate) fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn network_type_calls(&self) -> usize {
        self.network_type_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockClient {
    async fn latest_block_timestamp(&self) -> Result<u64, ContractCallError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        Ok(now - self.head_age)
    }

    async fn network_type(&self) -> Result<String, ContractCallError> {
        self.network_type_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.network.clone())
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ContractCallError> {
        self.calls.lock().push((to, input.clone()));
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .get(&(to, input))
            .cloned()
            .ok_or_else(|| ContractCallError::transport(Reverted))
    }

    async fn send_transaction(
        &self,
        to: Address,
        input: Bytes,
    ) -> Result<TxHash, ContractCallError> {
        let hash = keccak256(&input);
        self.sent.lock().push((to, input));
        Ok(hash)
    }
}
