//! Errors surfaced by name resolution.

use std::{error::Error, sync::Arc};

/// Possible errors when resolving a name.
///
/// Errors are cheap to clone so a failed registry binding can be handed to every caller that was
/// waiting on it.
#[derive(Clone, Debug, thiserror::Error)]
pub enum EnsError {
    /// The latest block is older than the configured freshness threshold.
    #[error("network not synced; last block was {age} seconds ago")]
    StaleNetwork {
        /// Age of the latest block, in seconds.
        age: u64,
    },
    /// There is no known registry deployment for the connected network.
    #[error("ENS is not supported on network {0}")]
    UnsupportedNetwork(String),
    /// The registry has no resolver recorded for the name.
    #[error("no resolver set for {0}")]
    NoResolver(String),
    #[error(transparent)]
    ContractCall(#[from] ContractCallError),
}

impl EnsError {
    /// Returns `true` if the error came from the contract call layer rather than from
    /// name-service validation.
    pub fn is_contract_call(&self) -> bool {
        matches!(self, Self::ContractCall(_))
    }
}

/// Errors raised while calling a contract method.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ContractCallError {
    #[error("contract has no method named `{0}`")]
    UnknownMethod(String),
    #[error("no overload of `{method}` takes {args} arguments")]
    ArgumentCount { method: String, args: usize },
    #[error("could not decode the output of `{method}`")]
    UnexpectedOutput { method: String },
    #[error(transparent)]
    Abi(Arc<alloy_dyn_abi::Error>),
    /// An error returned by the transport, including reverts, kept as-is.
    #[error(transparent)]
    Transport(Arc<dyn Error + Send + Sync>),
}

impl ContractCallError {
    /// Wraps an error coming from the underlying transport.
    pub fn transport(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns the transport error, if this is one, so callers can downcast it to the concrete
    /// transport type.
    pub fn as_transport(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<alloy_dyn_abi::Error> for ContractCallError {
    fn from(err: alloy_dyn_abi::Error) -> Self {
        Self::Abi(Arc::new(err))
    }
}
