//! Interfaces of the ENS registry and resolver contracts.

use alloy_json_abi::{Function, JsonAbi};
use std::sync::{Arc, LazyLock};

/// Name of the ERC-165 capability probe, the one resolver method that is not keyed by node.
pub const SUPPORTS_INTERFACE: &str = "supportsInterface";

static REGISTRY: LazyLock<Arc<JsonAbi>> = LazyLock::new(|| {
    Arc::new(parse_interface(&[
        "function owner(bytes32 node) external view returns (address)",
        "function resolver(bytes32 node) external view returns (address)",
        "function ttl(bytes32 node) external view returns (uint64)",
        "function recordExists(bytes32 node) external view returns (bool)",
        "function isApprovedForAll(address owner, address operator) external view returns (bool)",
        "function setOwner(bytes32 node, address owner) external",
        "function setResolver(bytes32 node, address resolver) external",
        "function setTTL(bytes32 node, uint64 ttl) external",
        "function setSubnodeOwner(bytes32 node, bytes32 label, address owner) external returns (bytes32)",
        "function setRecord(bytes32 node, address owner, address resolver, uint64 ttl) external",
        "function setSubnodeRecord(bytes32 node, bytes32 label, address owner, address resolver, uint64 ttl) external",
        "function setApprovalForAll(address operator, bool approved) external",
    ]))
});

static RESOLVER: LazyLock<Arc<JsonAbi>> = LazyLock::new(|| {
    Arc::new(parse_interface(&[
        "function supportsInterface(bytes4 interfaceID) external view returns (bool)",
        "function addr(bytes32 node) external view returns (address)",
        "function addr(bytes32 node, uint256 coinType) external view returns (bytes)",
        "function setAddr(bytes32 node, address a) external",
        "function setAddr(bytes32 node, uint256 coinType, bytes a) external",
        "function name(bytes32 node) external view returns (string)",
        "function setName(bytes32 node, string newName) external",
        "function text(bytes32 node, string key) external view returns (string)",
        "function setText(bytes32 node, string key, string value) external",
        "function contenthash(bytes32 node) external view returns (bytes)",
        "function setContenthash(bytes32 node, bytes hash) external",
        "function pubkey(bytes32 node) external view returns (bytes32 x, bytes32 y)",
        "function setPubkey(bytes32 node, bytes32 x, bytes32 y) external",
        "function ABI(bytes32 node, uint256 contentTypes) external view returns (uint256, bytes)",
        "function setABI(bytes32 node, uint256 contentType, bytes data) external",
        // pre-EIP-1577 content records
        "function content(bytes32 node) external view returns (bytes32)",
        "function multihash(bytes32 node) external view returns (bytes)",
    ]))
});

/// The ENS registry interface.
pub fn registry_abi() -> Arc<JsonAbi> {
    REGISTRY.clone()
}

/// The public resolver interface.
pub fn resolver_abi() -> Arc<JsonAbi> {
    RESOLVER.clone()
}

fn parse_interface(signatures: &[&str]) -> JsonAbi {
    let mut abi = JsonAbi::default();
    for sig in signatures {
        let function = Function::parse(sig).expect("invalid interface signature");
        abi.functions.entry(function.name.clone()).or_default().push(function);
    }
    abi
}
