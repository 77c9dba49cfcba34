//! The ENS registry contract.

use crate::{
    Node,
    abi::{registry_abi, resolver_abi},
    completion::settle,
    contract::{ContractHandle, single_output},
    error::EnsError,
    guard::NetworkGuard,
    namehash,
    once::OnceBinding,
    provider::ChainClient,
    resolver::ResolverBinding,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Address;
use futures::FutureExt;
use std::sync::Arc;

/// A wrapper around the registry contract of the connected network.
///
/// The contract is bound on first use: the network is checked, the registry address of the
/// network looked up, and the resulting handle kept for the lifetime of this value. Concurrent
/// lookups share a single binding, and a failed binding fails every lookup made through this
/// registry.
#[derive(Debug)]
pub struct Registry {
    client: Arc<dyn ChainClient>,
    contract: OnceBinding<ContractHandle>,
}

impl Registry {
    pub fn new(client: Arc<dyn ChainClient>, guard: NetworkGuard) -> Self {
        let registry_client = client.clone();
        let contract = OnceBinding::new(
            async move {
                let address = guard.check_network().await?;
                debug!(%address, "bound registry");
                Ok(ContractHandle::new(registry_abi(), address, registry_client))
            }
            .boxed(),
        );
        Self { client, contract }
    }

    /// Returns the registry contract, binding it if needed.
    pub async fn contract(&self) -> Result<ContractHandle, EnsError> {
        self.contract.get().await
    }

    /// Returns `true` once the registry binding was requested.
    pub fn is_bound(&self) -> bool {
        self.contract.is_started()
    }

    /// Returns the owner of `name`.
    pub async fn owner(&self, name: &str) -> Result<Address, EnsError> {
        let node = namehash(name);
        let outputs = self.call("owner", node).await?;
        Ok(single_output("owner", outputs, |value| value.as_address())?)
    }

    /// Same as [`Self::owner`], also reporting the outcome to `callback`.
    pub async fn owner_with<F>(&self, name: &str, callback: F) -> Result<Address, EnsError>
    where
        F: FnOnce(Result<&Address, &EnsError>) + Send,
    {
        settle(self.owner(name).await, callback)
    }

    /// Returns the resolver of `name`, bound to the name's node.
    ///
    /// Fails with [`EnsError::NoResolver`] if the registry has no resolver for the name.
    pub async fn resolver(&self, name: &str) -> Result<ResolverBinding, EnsError> {
        let node = namehash(name);
        let outputs = self.call("resolver", node).await?;
        let address = single_output("resolver", outputs, |value| value.as_address())?;
        if address.is_zero() {
            return Err(EnsError::NoResolver(name.to_string()));
        }
        trace!(%address, "found resolver for {name}");
        let resolver = ContractHandle::new(resolver_abi(), address, self.client.clone());
        Ok(ResolverBinding::new(&resolver, node))
    }

    /// Same as [`Self::resolver`], also reporting the outcome to `callback`.
    pub async fn resolver_with<F>(
        &self,
        name: &str,
        callback: F,
    ) -> Result<ResolverBinding, EnsError>
    where
        F: FnOnce(Result<&ResolverBinding, &EnsError>) + Send,
    {
        settle(self.resolver(name).await, callback)
    }

    /// Returns the caching time-to-live of `name`'s records, in seconds.
    pub async fn ttl(&self, name: &str) -> Result<u64, EnsError> {
        let node = namehash(name);
        let outputs = self.call("ttl", node).await?;
        Ok(single_output("ttl", outputs, |value| {
            value.as_uint().and_then(|(ttl, _)| u64::try_from(ttl).ok())
        })?)
    }

    /// Same as [`Self::ttl`], also reporting the outcome to `callback`.
    pub async fn ttl_with<F>(&self, name: &str, callback: F) -> Result<u64, EnsError>
    where
        F: FnOnce(Result<&u64, &EnsError>) + Send,
    {
        settle(self.ttl(name).await, callback)
    }

    async fn call(&self, method: &str, node: Node) -> Result<Vec<DynSolValue>, EnsError> {
        let contract = self.contract().await?;
        Ok(contract.method(method)?.call(&[DynSolValue::FixedBytes(node, 32)]).await?)
    }
}
