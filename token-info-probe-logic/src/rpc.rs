use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::{RpcError, TransportError},
};
use async_trait::async_trait;
use url::Url;

use crate::{client::ContractReader, error::CallError};

/// Error code nodes use for a call that reverted during execution.
const EXECUTION_ERROR_CODE: i64 = 3;

/// Message fragments of node errors caused by the callee's code rather than by the node.
const EXECUTION_FAILURE_MESSAGES: [&str; 4] =
    ["revert", "invalid opcode", "out of gas", "invalid jump"];

/// [`ContractReader`] over an Ethereum JSON-RPC node, reading the latest state.
#[derive(Clone)]
pub struct RpcContractReader {
    provider: DynProvider<Ethereum>,
}

impl RpcContractReader {
    pub fn new(provider: DynProvider<Ethereum>) -> Self {
        Self { provider }
    }

    pub fn from_url(url: Url) -> Self {
        Self::new(build_http_provider(url))
    }
}

#[async_trait]
impl ContractReader for RpcContractReader {
    async fn has_code(&self, address: Address) -> Result<bool, CallError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            // a code lookup never executes anything, so any error is the node's
            .map_err(|err| CallError::Transport(err.to_string()))?;
        Ok(!code.is_empty())
    }

    async fn static_call(&self, address: Address, calldata: Bytes) -> Result<Bytes, CallError> {
        let tx = TransactionRequest::default()
            .with_to(address)
            .with_input(calldata);
        self.provider.call(tx).await.map_err(classify_call_error)
    }
}

pub fn build_http_provider(url: Url) -> DynProvider<Ethereum> {
    ProviderBuilder::new().connect_http(url).erased()
}

fn classify_call_error(err: TransportError) -> CallError {
    match err {
        RpcError::ErrorResp(payload)
            if !payload.is_retry_err()
                && is_execution_failure(payload.code, &payload.message) =>
        {
            CallError::Reverted(payload.to_string())
        }
        other => CallError::Transport(other.to_string()),
    }
}

fn is_execution_failure(code: i64, message: &str) -> bool {
    let message = message.to_lowercase();
    code == EXECUTION_ERROR_CODE
        || EXECUTION_FAILURE_MESSAGES
            .iter()
            .any(|fragment| message.contains(fragment))
}
