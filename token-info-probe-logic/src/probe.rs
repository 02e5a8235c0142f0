use alloy::primitives::{Address, Bytes};
use futures::{StreamExt, TryStreamExt};
use tracing::instrument;

use crate::{
    abi::encode_token_infos,
    client::{ContractReader, TokenClient},
    error::{CallError, ProbeError},
    settings::ProbeSettings,
    types::{ProbeStatus, ProbedToken, TokenInfo},
};

/// Reads `symbol()` and `decimals()` from a list of addresses in one pass.
///
/// Every address gets exactly one slot in the result, at the same index as in the input.
/// A slot is left at its default value when the address has no code or `symbol()` fails, and
/// only `decimals` is left zero when `decimals()` fails after `symbol()` succeeded. A failed
/// code lookup or a transport-level failure of a call aborts the whole invocation.
pub struct TokenInfoProbe<R> {
    client: TokenClient<R>,
    settings: ProbeSettings,
}

impl<R: ContractReader> TokenInfoProbe<R> {
    pub fn new(reader: R, settings: ProbeSettings) -> Self {
        Self {
            client: TokenClient::new(reader),
            settings,
        }
    }

    /// Probes `addresses` and returns the ABI encoding of the `(string,uint8)[]` result.
    pub async fn probe(&self, addresses: &[Address]) -> Result<Bytes, ProbeError> {
        let infos = self.probe_infos(addresses).await?;
        Ok(encode_token_infos(&infos))
    }

    pub async fn probe_infos(&self, addresses: &[Address]) -> Result<Vec<TokenInfo>, ProbeError> {
        let slots = self.probe_detailed(addresses).await?;
        Ok(slots.into_iter().map(|slot| slot.info).collect())
    }

    /// Like [`Self::probe_infos`], but every slot also says how far probing got.
    #[instrument(skip_all, fields(addresses = addresses.len()), level = "debug", err)]
    pub async fn probe_detailed(
        &self,
        addresses: &[Address],
    ) -> Result<Vec<ProbedToken>, ProbeError> {
        // `buffered` yields in input order regardless of completion order
        futures::stream::iter(addresses.iter().copied())
            .map(|address| self.probe_address(address))
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await
    }

    async fn probe_address(&self, address: Address) -> Result<ProbedToken, ProbeError> {
        // any code lookup failure is an environment failure
        if !self.client.has_code(address).await? {
            return Ok(ProbedToken::empty(address, ProbeStatus::NoCode));
        }

        let symbol = match self.client.try_call_symbol(address).await {
            Ok(symbol) => symbol,
            Err(err) => {
                recover(address, "symbol", err)?;
                return Ok(ProbedToken::empty(address, ProbeStatus::SymbolFailed));
            }
        };

        let (decimals, status) = match self.client.try_call_decimals(address).await {
            Ok(decimals) => (decimals, ProbeStatus::Complete),
            Err(err) => {
                recover(address, "decimals", err)?;
                (0, ProbeStatus::DecimalsFailed)
            }
        };

        Ok(ProbedToken {
            address,
            info: TokenInfo { symbol, decimals },
            status,
        })
    }
}

fn recover(address: Address, probe: &'static str, err: CallError) -> Result<(), ProbeError> {
    if !err.is_recoverable() {
        return Err(ProbeError::Environment(err));
    }
    tracing::debug!(%address, probe, err = %err, "probe failed, leaving field empty");
    Ok(())
}
