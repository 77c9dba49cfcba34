//! Ethereum Name Service resolution.
//!
//! [`NameService`] resolves names through the ENS registry of the connected network. Before the
//! registry is used, the network is checked: the node must be synced and the network must have a
//! known registry deployment (see [`EnsConfig`]).
//!
//! Lookups go through two contracts. The [`Registry`] maps the [`namehash`] of a name to its
//! owner and resolver, and the [`ResolverBinding`] returned for a name answers record queries with
//! the name's node already applied.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

use alloy_primitives::B256;

pub mod abi;
mod completion;
pub mod config;
pub mod contract;
pub mod error;
pub mod guard;
mod once;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod service;

#[cfg(test)]
mod mock;

pub use alloy_ens::namehash;
pub use config::{DeploymentTable, ENS_REGISTRY, EnsConfig};
pub use contract::{ContractHandle, ContractMethod, Methods};
pub use error::{ContractCallError, EnsError};
pub use guard::NetworkGuard;
pub use provider::{ChainClient, RpcClient};
pub use registry::Registry;
pub use resolver::ResolverBinding;
pub use service::{NameService, reverse_name};

/// The namehash of an ENS name, the key of its records in the registry and resolvers.
pub type Node = B256;
