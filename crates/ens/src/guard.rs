//! Validation of the connected network.

use crate::{config::DeploymentTable, error::EnsError, provider::ChainClient};
use alloy_primitives::Address;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Default maximum age of the latest block, in seconds, before the node is considered unsynced.
pub const DEFAULT_MAX_HEAD_AGE: u64 = 3600;

/// Checks that the connected network is synced and has a known registry deployment.
#[derive(Clone, Debug)]
pub struct NetworkGuard {
    client: Arc<dyn ChainClient>,
    deployments: Arc<DeploymentTable>,
    max_head_age: u64,
}

impl NetworkGuard {
    pub fn new(client: Arc<dyn ChainClient>, deployments: Arc<DeploymentTable>) -> Self {
        Self { client, deployments, max_head_age: DEFAULT_MAX_HEAD_AGE }
    }

    /// Sets the maximum accepted age of the latest block, in seconds.
    pub fn with_max_head_age(mut self, max_head_age: u64) -> Self {
        self.max_head_age = max_head_age;
        self
    }

    /// Returns the address of the registry on the connected network.
    ///
    /// Fails with [`EnsError::StaleNetwork`] if the latest block is older than the configured
    /// maximum age, since an unsynced node would answer with outdated records, and with
    /// [`EnsError::UnsupportedNetwork`] if the network has no known deployment. Nothing is
    /// cached: every call queries the node again.
    pub async fn check_network(&self) -> Result<Address, EnsError> {
        let timestamp = self.client.latest_block_timestamp().await?;
        let age = head_age(SystemTime::now(), timestamp);
        if age > Duration::from_secs(self.max_head_age) {
            let age = age.as_secs();
            debug!(age, max = self.max_head_age, "network not synced");
            return Err(EnsError::StaleNetwork { age });
        }

        let network = self.client.network_type().await?;
        match self.deployments.get(&network) {
            Some(registry) => {
                debug!(%network, %registry, age = age.as_secs(), "network ok");
                Ok(registry)
            }
            None => {
                debug!(%network, "no registry deployment");
                Err(EnsError::UnsupportedNetwork(network))
            }
        }
    }
}

/// Time elapsed between the block `timestamp` and `now`, or zero if the block lies in the future.
fn head_age(now: SystemTime, timestamp: u64) -> Duration {
    now.duration_since(UNIX_EPOCH + Duration::from_secs(timestamp)).unwrap_or_default()
}
