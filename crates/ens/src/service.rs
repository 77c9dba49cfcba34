//! The name service entry point.

use crate::{
    completion::settle,
    config::EnsConfig,
    error::EnsError,
    guard::NetworkGuard,
    provider::{ChainClient, RpcClient},
    registry::Registry,
};
use alloy_primitives::{Address, Bytes, FixedBytes, hex};
use alloy_provider::Provider;
use std::sync::Arc;

/// Resolves names on the network a [`ChainClient`] is connected to.
///
/// # Example
///
/// ```no_run
/// use alloy_provider::ProviderBuilder;
/// use ens_resolver::NameService;
///
/// # async fn foo() -> eyre::Result<()> {
/// let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
/// let ens = NameService::new(provider);
/// let address = ens.get_address("vitalik.eth").await?;
/// println!("{address}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct NameService {
    client: Arc<dyn ChainClient>,
    guard: NetworkGuard,
}

impl NameService {
    /// Creates a name service on top of `provider` with the default configuration.
    pub fn new<P: Provider + 'static>(provider: P) -> Self {
        Self::with_client(RpcClient::shared(provider), &EnsConfig::default())
    }

    /// Creates a name service using `client` for all chain access.
    pub fn with_client(client: Arc<dyn ChainClient>, config: &EnsConfig) -> Self {
        let guard = NetworkGuard::new(client.clone(), Arc::new(config.deployments.clone()))
            .with_max_head_age(config.max_head_age);
        Self { client, guard }
    }

    /// Checks that the connected network is synced and supports ENS, and returns the address of
    /// its registry.
    pub async fn check_network(&self) -> Result<Address, EnsError> {
        self.guard.check_network().await
    }

    /// Same as [`Self::check_network`], also reporting the outcome to `callback`.
    pub async fn check_network_with<F>(&self, callback: F) -> Result<Address, EnsError>
    where
        F: FnOnce(Result<&Address, &EnsError>) + Send,
    {
        settle(self.check_network().await, callback)
    }

    /// Returns a new registry for this service's network.
    ///
    /// The network is not checked until the registry is first used.
    pub fn registry(&self) -> Registry {
        Registry::new(self.client.clone(), self.guard.clone())
    }

    /// Returns the address record of `name`.
    pub async fn get_address(&self, name: &str) -> Result<Address, EnsError> {
        self.registry().resolver(name).await?.addr().await
    }

    /// Same as [`Self::get_address`], also reporting the outcome to `callback`.
    pub async fn get_address_with<F>(&self, name: &str, callback: F) -> Result<Address, EnsError>
    where
        F: FnOnce(Result<&Address, &EnsError>) + Send,
    {
        settle(self.get_address(name).await, callback)
    }

    /// Returns the owner of `name`.
    pub async fn get_owner(&self, name: &str) -> Result<Address, EnsError> {
        self.registry().owner(name).await
    }

    /// Returns the text record of `name` stored under `key`.
    pub async fn get_text(&self, name: &str, key: &str) -> Result<String, EnsError> {
        self.registry().resolver(name).await?.text(key).await
    }

    /// Returns the content hash of `name`.
    pub async fn get_content_hash(&self, name: &str) -> Result<Bytes, EnsError> {
        self.registry().resolver(name).await?.contenthash().await
    }

    /// Returns whether the resolver of `name` implements `interface_id`.
    pub async fn supports_interface(
        &self,
        name: &str,
        interface_id: FixedBytes<4>,
    ) -> Result<bool, EnsError> {
        self.registry().resolver(name).await?.supports_interface(interface_id).await
    }

    /// Returns the primary name of `address`, as recorded in its reverse record.
    pub async fn lookup_address(&self, address: Address) -> Result<String, EnsError> {
        self.registry().resolver(&reverse_name(address)).await?.name().await
    }
}

/// Returns the reverse-resolution name of `address`: `<lowercase hex>.addr.reverse`.
pub fn reverse_name(address: Address) -> String {
    format!("{}.addr.reverse", hex::encode(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{MAINNET_REGISTRY, MockClient},
        namehash,
    };
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::{address, bytes};
    use parking_lot::Mutex;

    const RESOLVER: Address = address!("0x4976fb03C32e5B8cfe2b6cCB31c09Ba78EBaBa41");
    const ALICE: Address = address!("0x000000000000000000000000000000000000abcd");

    fn node_arg(name: &str) -> [DynSolValue; 1] {
        [DynSolValue::FixedBytes(namehash(name), 32)]
    }

    fn service(client: &Arc<MockClient>) -> NameService {
        NameService::with_client(client.clone(), &EnsConfig::default())
    }

    /// A mainnet node where `name` uses the public resolver.
    fn client_with_resolver(name: &str) -> Arc<MockClient> {
        let client = Arc::new(MockClient::new());
        client.on_call(
            MAINNET_REGISTRY,
            "resolver(bytes32)",
            &node_arg(name),
            &[DynSolValue::Address(RESOLVER)],
        );
        client
    }

    #[tokio::test]
    async fn resolves_address() {
        let client = client_with_resolver("alice.eth");
        client.on_call(
            RESOLVER,
            "addr(bytes32)",
            &node_arg("alice.eth"),
            &[DynSolValue::Address(ALICE)],
        );

        let ens = service(&client);
        assert_eq!(ens.get_address("alice.eth").await.unwrap(), ALICE);

        // registry first, resolver second
        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, MAINNET_REGISTRY);
        assert_eq!(calls[1].0, RESOLVER);
    }

    #[tokio::test]
    async fn unsupported_network_reaches_callback_once() {
        let client = Arc::new(MockClient::new().with_network("ropsten-forked-test"));
        let ens = service(&client);

        let seen = Mutex::new(vec![]);
        let err = ens
            .get_address_with("alice.eth", |res| {
                seen.lock().push(res.copied().map_err(ToString::to_string))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnsError::UnsupportedNetwork(_)));
        assert_eq!(err.to_string(), "ENS is not supported on network ropsten-forked-test");
        assert_eq!(*seen.lock(), vec![Err(err.to_string())]);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn callback_sees_the_resolved_address() {
        let client = client_with_resolver("alice.eth");
        client.on_call(
            RESOLVER,
            "addr(bytes32)",
            &node_arg("alice.eth"),
            &[DynSolValue::Address(ALICE)],
        );

        let seen = Mutex::new(vec![]);
        let address = service(&client)
            .get_address_with("alice.eth", |res| {
                seen.lock().push(res.copied().map_err(ToString::to_string))
            })
            .await
            .unwrap();
        assert_eq!(*seen.lock(), vec![Ok(address)]);
    }

    #[tokio::test]
    async fn resolver_call_failure_reaches_callback() {
        // the resolver has no address record, the mock reverts
        let client = client_with_resolver("alice.eth");

        let seen = Mutex::new(vec![]);
        let err = service(&client)
            .get_address_with("alice.eth", |res| {
                seen.lock().push(res.copied().map_err(ToString::to_string))
            })
            .await
            .unwrap_err();
        assert!(err.is_contract_call());
        assert_eq!(*seen.lock(), vec![Err(err.to_string())]);
    }

    #[tokio::test]
    async fn check_network_reports_registry() {
        let client = Arc::new(MockClient::new());
        let ens = service(&client);

        let seen = Mutex::new(vec![]);
        let registry = ens
            .check_network_with(|res| seen.lock().push(res.copied().map_err(ToString::to_string)))
            .await
            .unwrap();
        assert_eq!(registry, MAINNET_REGISTRY);
        assert_eq!(*seen.lock(), vec![Ok(MAINNET_REGISTRY)]);

        let stale = service(&Arc::new(MockClient::new().with_head_age(3601)));
        assert!(matches!(stale.check_network().await, Err(EnsError::StaleNetwork { .. })));
    }

    #[tokio::test]
    async fn registry_access_is_lazy_and_fresh() {
        let client = Arc::new(MockClient::new());
        let ens = service(&client);

        let registry = ens.registry();
        assert!(!registry.is_bound());
        assert_eq!(client.block_calls(), 0);

        registry.contract().await.unwrap();
        ens.registry().contract().await.unwrap();
        // every new registry validates the network again
        assert_eq!(client.block_calls(), 2);
    }

    #[tokio::test]
    async fn record_helpers() {
        let client = client_with_resolver("alice.eth");
        let key = DynSolValue::String("com.github".to_string());
        client.on_call(
            RESOLVER,
            "text(bytes32,string)",
            &[node_arg("alice.eth")[0].clone(), key],
            &[DynSolValue::String("alice".to_string())],
        );
        let hash = bytes!("0xe3010170122029f2d17be6139079dc48696d1f582a8530eb9805b561eda517e22a892c7e3f1f");
        client.on_call(
            RESOLVER,
            "contenthash(bytes32)",
            &node_arg("alice.eth"),
            &[DynSolValue::Bytes(hash.to_vec())],
        );

        let ens = service(&client);
        assert_eq!(ens.get_text("alice.eth", "com.github").await.unwrap(), "alice");
        assert_eq!(ens.get_content_hash("alice.eth").await.unwrap(), hash);
    }

    #[tokio::test]
    async fn reverse_lookup() {
        let reverse = reverse_name(ALICE);
        assert_eq!(reverse, "000000000000000000000000000000000000abcd.addr.reverse");

        let client = client_with_resolver(&reverse);
        client.on_call(
            RESOLVER,
            "name(bytes32)",
            &node_arg(&reverse),
            &[DynSolValue::String("alice.eth".to_string())],
        );
        assert_eq!(service(&client).lookup_address(ALICE).await.unwrap(), "alice.eth");
    }

    #[test]
    fn distinct_names_have_distinct_nodes() {
        assert_ne!(namehash("alice.eth"), namehash("bob.eth"));
        assert_eq!(namehash("alice.eth"), namehash("alice.eth"));
    }
}
