//! A resolver contract bound to a single name.

use crate::{
    Node,
    abi::SUPPORTS_INTERFACE,
    contract::{ContractHandle, ContractMethod, single_output},
    error::EnsError,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, Bytes, FixedBytes};
use std::ops::Deref;

/// A resolver [`ContractHandle`] whose methods take the node of the resolved name implicitly.
///
/// Every method except `supportsInterface`, which does not depend on the name, has the node
/// applied as its first argument, so `binding.method("addr")?.call(&[])` calls `addr(node)`.
/// All other arguments and the call and send semantics are unchanged.
#[derive(Clone, Debug)]
pub struct ResolverBinding {
    contract: ContractHandle,
    node: Node,
}

impl ResolverBinding {
    /// Binds every node-keyed method of `resolver` to `node`.
    pub fn new(resolver: &ContractHandle, node: Node) -> Self {
        let contract = resolver.map_methods(|method| bind_node(method, node));
        Self { contract, node }
    }

    /// The node every method is bound to.
    pub fn node(&self) -> Node {
        self.node
    }

    /// Returns the address record.
    pub async fn addr(&self) -> Result<Address, EnsError> {
        let outputs = self.method("addr(bytes32)")?.call(&[]).await?;
        Ok(single_output("addr", outputs, |value| value.as_address())?)
    }

    /// Returns the name record, as set for reverse resolution.
    pub async fn name(&self) -> Result<String, EnsError> {
        let outputs = self.method("name")?.call(&[]).await?;
        Ok(single_output("name", outputs, |value| value.as_str().map(str::to_string))?)
    }

    /// Returns the text record stored under `key`.
    pub async fn text(&self, key: &str) -> Result<String, EnsError> {
        let outputs = self.method("text")?.call(&[DynSolValue::String(key.to_string())]).await?;
        Ok(single_output("text", outputs, |value| value.as_str().map(str::to_string))?)
    }

    /// Returns the EIP-1577 content hash.
    pub async fn contenthash(&self) -> Result<Bytes, EnsError> {
        let outputs = self.method("contenthash")?.call(&[]).await?;
        Ok(single_output("contenthash", outputs, |value| {
            value.as_bytes().map(Bytes::copy_from_slice)
        })?)
    }

    /// Returns whether the resolver implements the ERC-165 interface `interface_id`.
    pub async fn supports_interface(&self, interface_id: FixedBytes<4>) -> Result<bool, EnsError> {
        let outputs = self
            .method(SUPPORTS_INTERFACE)?
            .call(&[interface_arg(interface_id)])
            .await?;
        Ok(single_output(SUPPORTS_INTERFACE, outputs, |value| value.as_bool())?)
    }
}

impl Deref for ResolverBinding {
    type Target = ContractHandle;

    fn deref(&self) -> &Self::Target {
        &self.contract
    }
}

fn interface_arg(interface_id: FixedBytes<4>) -> DynSolValue {
    DynSolValue::FixedBytes(B256::right_padding_from(interface_id.as_slice()), 4)
}

fn bind_node(method: &ContractMethod, node: Node) -> ContractMethod {
    if method.name() == SUPPORTS_INTERFACE {
        method.clone()
    } else {
        method.partial(DynSolValue::FixedBytes(node, 32))
    }
}
