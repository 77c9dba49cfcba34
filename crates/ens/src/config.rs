//! Name service configuration.
//!
//! The configuration is loaded once at startup from, in increasing priority: the built-in
//! defaults, `ens.toml` (or the file named by `ENS_CONFIG`), and `ENS_` prefixed environment
//! variables.

use crate::guard::DEFAULT_MAX_HEAD_AGE;
use alloy_primitives::{Address, address};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, ops::Deref};

/// Address of the ENS registry (with fallback) on the public networks.
pub const ENS_REGISTRY: Address = address!("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Networks on which [`ENS_REGISTRY`] is deployed.
const DEFAULT_NETWORKS: [&str; 6] = ["main", "ropsten", "rinkeby", "goerli", "sepolia", "holesky"];

/// Registry deployments, keyed by network label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentTable {
    registries: BTreeMap<String, Address>,
}

impl DeploymentTable {
    /// Creates a new table from `(network, registry)` pairs.
    pub fn new(registries: impl IntoIterator<Item = (impl Into<String>, Address)>) -> Self {
        Self {
            registries: registries
                .into_iter()
                .map(|(network, registry)| (network.into(), registry))
                .collect(),
        }
    }

    /// Returns the registry address deployed on `network`.
    pub fn get(&self, network: &str) -> Option<Address> {
        self.registries.get(network).copied()
    }
}

impl Default for DeploymentTable {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORKS.map(|network| (network, ENS_REGISTRY)))
    }
}

impl Deref for DeploymentTable {
    type Target = BTreeMap<String, Address>;

    fn deref(&self) -> &Self::Target {
        &self.registries
    }
}

/// Name service settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsConfig {
    /// Registry address per network label.
    pub deployments: DeploymentTable,
    /// Maximum age of the latest block, in seconds.
    pub max_head_age: u64,
}

impl EnsConfig {
    /// The default name of the configuration file.
    pub const FILE_NAME: &'static str = "ens.toml";

    /// Returns the [`Figment`] the configuration is extracted from.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(Env::var_or("ENS_CONFIG", Self::FILE_NAME)))
            .merge(Env::prefixed("ENS_").ignore(&["CONFIG"]))
    }

    /// Loads the configuration from the default sources.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self { deployments: DeploymentTable::default(), max_head_age: DEFAULT_MAX_HEAD_AGE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn defaults() {
        figment::Jail::expect_with(|_| {
            let config = EnsConfig::load()?;
            assert_eq!(config, EnsConfig::default());
            assert_eq!(config.max_head_age, 3600);
            assert_eq!(config.deployments.get("main"), Some(ENS_REGISTRY));
            assert_eq!(config.deployments.get("private"), None);
            Ok(())
        });
    }

    #[test]
    fn file_extends_default_deployments() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "ens.toml",
                r#"
                max_head_age = 600

                [deployments]
                private = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
            )?;
            let config = EnsConfig::load()?;
            assert_eq!(config.max_head_age, 600);
            assert_eq!(
                config.deployments.get("private"),
                Some(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"))
            );
            assert_eq!(config.deployments.get("sepolia"), Some(ENS_REGISTRY));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "max_head_age = 600")?;
            jail.set_env("ENS_CONFIG", "custom.toml");
            let config = EnsConfig::load()?;
            assert_eq!(config.max_head_age, 600);

            jail.set_env("ENS_MAX_HEAD_AGE", 30);
            let config = EnsConfig::load()?;
            assert_eq!(config.max_head_age, 30);
            Ok(())
        });
    }
}
