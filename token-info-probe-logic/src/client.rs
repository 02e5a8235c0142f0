use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use async_trait::async_trait;

use crate::{
    abi::{decimalsCall, symbolCall},
    error::{CallError, DecodeError},
};

/// Read-only access to deployed contracts.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Returns true if `address` has deployed code.
    async fn has_code(&self, address: Address) -> Result<bool, CallError>;

    /// Executes `calldata` against `address` without changing any state
    /// and returns the raw return data.
    async fn static_call(&self, address: Address, calldata: Bytes) -> Result<Bytes, CallError>;
}

/// Typed access to the ERC-20 metadata entry points of an arbitrary address.
///
/// Nothing guarantees the address actually implements them, so every call
/// returns a `Result` the caller is expected to recover from.
pub struct TokenClient<R> {
    reader: R,
}

impl<R: ContractReader> TokenClient<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub async fn has_code(&self, address: Address) -> Result<bool, CallError> {
        self.reader.has_code(address).await
    }

    pub async fn try_call_symbol(&self, address: Address) -> Result<String, CallError> {
        self.try_call(address, symbolCall {}).await
    }

    pub async fn try_call_decimals(&self, address: Address) -> Result<u8, CallError> {
        self.try_call(address, decimalsCall {}).await
    }

    async fn try_call<C: SolCall>(
        &self,
        address: Address,
        call: C,
    ) -> Result<C::Return, CallError> {
        let data = self
            .reader
            .static_call(address, call.abi_encode().into())
            .await?;
        // validating decode: non-utf8 strings and out-of-range integers are rejected
        Ok(C::abi_decode_returns_validate(&data).map_err(DecodeError::from)?)
    }
}
