use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolValue,
};
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    abi::{DECIMALS_SELECTOR, SYMBOL_SELECTOR},
    client::ContractReader,
    error::CallError,
};

type CallKey = (Address, [u8; 4]);

/// In-memory contract reader for testing.
/// Addresses without registered code behave like EOAs; calls without a registered
/// response revert.
#[derive(Clone, Default)]
pub struct MockContractReader {
    code: Arc<RwLock<HashSet<Address>>>,
    code_errors: Arc<RwLock<HashMap<Address, CallError>>>,
    responses: Arc<RwLock<HashMap<CallKey, Result<Bytes, CallError>>>>,
    delays: Arc<RwLock<HashMap<Address, Duration>>>,
    should_fail: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<CallKey>>>,
}

impl MockContractReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_code(&self, address: Address) {
        self.code.write().insert(address);
    }

    /// Register a well-behaved token.
    pub fn add_token(&self, address: Address, symbol: &str, decimals: u8) {
        self.add_code(address);
        self.set_call_response(
            address,
            SYMBOL_SELECTOR,
            Ok(symbol.to_string().abi_encode().into()),
        );
        self.set_call_response(
            address,
            DECIMALS_SELECTOR,
            Ok(U256::from(decimals).abi_encode().into()),
        );
    }

    /// Make the code lookup for `address` fail with `err`.
    pub fn set_code_error(&self, address: Address, err: CallError) {
        self.code_errors.write().insert(address, err);
    }

    pub fn set_call_response(
        &self,
        address: Address,
        selector: [u8; 4],
        response: Result<Bytes, CallError>,
    ) {
        self.responses.write().insert((address, selector), response);
    }

    /// Delay every request for `address`, to shuffle completion order.
    pub fn set_delay(&self, address: Address, delay: Duration) {
        self.delays.write().insert(address, delay);
    }

    /// Make every request fail at the transport level.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write() = fail;
    }

    /// Calls issued so far, in issue order.
    pub fn calls(&self) -> Vec<CallKey> {
        self.calls.read().clone()
    }

    async fn before_request(&self, address: Address) -> Result<(), CallError> {
        let delay = self.delays.read().get(&address).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.should_fail.read() {
            return Err(CallError::Transport(
                "mock reader configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContractReader for MockContractReader {
    async fn has_code(&self, address: Address) -> Result<bool, CallError> {
        self.before_request(address).await?;
        if let Some(err) = self.code_errors.read().get(&address) {
            return Err(err.clone());
        }
        Ok(self.code.read().contains(&address))
    }

    async fn static_call(&self, address: Address, calldata: Bytes) -> Result<Bytes, CallError> {
        self.before_request(address).await?;

        let selector: [u8; 4] = calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CallError::Reverted("calldata shorter than a selector".to_string()))?;
        self.calls.write().push((address, selector));

        if !self.code.read().contains(&address) {
            // calling an account without code succeeds with empty return data
            return Ok(Bytes::new());
        }

        self.responses
            .read()
            .get(&(address, selector))
            .cloned()
            .unwrap_or_else(|| Err(CallError::Reverted("execution reverted".to_string())))
    }
}
