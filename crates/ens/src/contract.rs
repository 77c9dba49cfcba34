//! A deployed contract and the callable methods derived from its interface.

use crate::{error::ContractCallError, provider::ChainClient};
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, TxHash};
use std::{collections::BTreeMap, fmt, ops::Deref, sync::Arc};

/// A contract deployed at `address` implementing `abi`.
#[derive(Clone)]
pub struct ContractHandle {
    address: Address,
    methods: Methods,
}

impl ContractHandle {
    /// Creates a handle for the contract at `address`.
    ///
    /// Every function of the interface is exposed twice in [`Self::methods`]: once under its
    /// name, dispatching between overloads on the number of arguments, and once under its full
    /// signature, e.g. `addr(bytes32,uint256)`.
    pub fn new(abi: Arc<JsonAbi>, address: Address, client: Arc<dyn ChainClient>) -> Self {
        let mut methods = BTreeMap::new();
        for (name, overloads) in &abi.functions {
            let method = ContractMethod::new(name, overloads.clone(), address, client.clone());
            methods.insert(name.clone(), method);
            if overloads.len() > 1 {
                for function in overloads {
                    let method =
                        ContractMethod::new(name, vec![function.clone()], address, client.clone());
                    methods.insert(function.signature(), method);
                }
            }
        }
        Self { address, methods: Methods(methods) }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    /// Returns the method registered under `name`.
    pub fn method(&self, name: &str) -> Result<&ContractMethod, ContractCallError> {
        self.methods.get(name).ok_or_else(|| ContractCallError::UnknownMethod(name.to_string()))
    }

    /// Returns a new handle whose method set is `f` applied to every method of this one.
    pub fn map_methods(&self, mut f: impl FnMut(&ContractMethod) -> ContractMethod) -> Self {
        let methods = self.methods.iter().map(|(key, method)| (key.clone(), f(method))).collect();
        Self { address: self.address, methods: Methods(methods) }
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("methods", &self.methods.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The callable methods of a [`ContractHandle`], keyed by name and by signature.
#[derive(Clone, Debug, Default)]
pub struct Methods(BTreeMap<String, ContractMethod>);

impl Deref for Methods {
    type Target = BTreeMap<String, ContractMethod>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A contract function, possibly with leading arguments already applied.
#[derive(Clone)]
pub struct ContractMethod {
    name: String,
    overloads: Arc<[Function]>,
    bound: Vec<DynSolValue>,
    address: Address,
    client: Arc<dyn ChainClient>,
}

impl ContractMethod {
    fn new(
        name: &str,
        overloads: Vec<Function>,
        address: Address,
        client: Arc<dyn ChainClient>,
    ) -> Self {
        Self { name: name.to_string(), overloads: overloads.into(), bound: vec![], address, client }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments applied with [`Self::partial`], in order.
    pub fn bound_args(&self) -> &[DynSolValue] {
        &self.bound
    }

    /// Returns a copy of this method with `arg` applied after any previously bound arguments.
    ///
    /// Arguments passed to [`Self::call`] and [`Self::send`] follow the bound ones.
    pub fn partial(&self, arg: DynSolValue) -> Self {
        let mut method = self.clone();
        method.bound.push(arg);
        method
    }

    /// ABI-encodes a call with the bound arguments followed by `args`.
    pub fn calldata(&self, args: &[DynSolValue]) -> Result<Bytes, ContractCallError> {
        self.encode(args).map(|(_, input)| input)
    }

    /// Executes a read-only call and returns the decoded outputs.
    pub async fn call(&self, args: &[DynSolValue]) -> Result<Vec<DynSolValue>, ContractCallError> {
        let (function, input) = self.encode(args)?;
        trace!(address = %self.address, method = %self.name, "call");
        let output = self.client.call(self.address, input).await?;
        Ok(function.abi_decode_output(&output)?)
    }

    /// Submits the call as a transaction.
    pub async fn send(&self, args: &[DynSolValue]) -> Result<TxHash, ContractCallError> {
        let (_, input) = self.encode(args)?;
        trace!(address = %self.address, method = %self.name, "send");
        self.client.send_transaction(self.address, input).await
    }

    fn encode(&self, args: &[DynSolValue]) -> Result<(&Function, Bytes), ContractCallError> {
        let values: Vec<DynSolValue> = self.bound.iter().chain(args).cloned().collect();
        let mut candidates =
            self.overloads.iter().filter(|function| function.inputs.len() == values.len());
        let Some(first) = candidates.next() else {
            return Err(ContractCallError::ArgumentCount {
                method: self.name.clone(),
                args: values.len(),
            });
        };
        // Overloads with the same arity are told apart by whether the values fit their types.
        match first.abi_encode_input(&values) {
            Ok(input) => Ok((first, Bytes::from(input))),
            Err(err) => candidates
                .find_map(|function| {
                    let input = function.abi_encode_input(&values).ok()?;
                    Some((function, Bytes::from(input)))
                })
                .ok_or_else(|| ContractCallError::from(err)),
        }
    }
}

impl fmt::Debug for ContractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractMethod")
            .field("name", &self.name)
            .field("overloads", &self.overloads.len())
            .field("bound", &self.bound)
            .finish()
    }
}

/// Extracts the single output of `method` with `f`.
pub(crate) fn single_output<T>(
    method: &str,
    outputs: Vec<DynSolValue>,
    f: impl FnOnce(DynSolValue) -> Option<T>,
) -> Result<T, ContractCallError> {
    outputs
        .into_iter()
        .next()
        .and_then(f)
        .ok_or_else(|| ContractCallError::UnexpectedOutput { method: method.to_string() })
}
