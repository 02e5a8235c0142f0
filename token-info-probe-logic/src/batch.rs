use alloy::primitives::Address;
use anyhow::Context;
use futures::StreamExt;
use tracing::instrument;

use crate::{
    abi::decode_token_infos,
    client::ContractReader,
    error::ProbeError,
    probe::TokenInfoProbe,
    settings::BatchSettings,
    types::{ResolvedToken, TokenInfo},
};

/// Resolves token metadata for arbitrarily long address lists by splitting them into
/// batches, probing the batches concurrently and decoding every returned buffer.
///
/// A batch whose invocation fails is logged and resolved to empty tokens, so the result
/// always has one entry per requested address, in request order.
pub struct TokenInfoBatcher<R> {
    probe: TokenInfoProbe<R>,
    settings: BatchSettings,
}

impl<R: ContractReader> TokenInfoBatcher<R> {
    pub fn new(probe: TokenInfoProbe<R>, settings: BatchSettings) -> Self {
        Self { probe, settings }
    }

    #[instrument(skip_all, fields(addresses = addresses.len()))]
    pub async fn fetch(&self, addresses: Vec<Address>) -> Vec<ResolvedToken> {
        let batch_size = self.settings.batch_size.max(1);
        let batches_count = addresses.len().div_ceil(batch_size);

        let mut batches = futures::stream::iter(addresses.chunks(batch_size).enumerate())
            .map(|(index, batch)| async move { (index, self.fetch_batch(batch).await) })
            .buffer_unordered(self.settings.max_concurrent_batches.max(1));

        let mut results = vec![Vec::new(); batches_count];
        while let Some((index, tokens)) = batches.next().await {
            results[index] = tokens;
        }

        let tokens: Vec<ResolvedToken> = results.into_iter().flatten().collect();
        tracing::info!(
            total = tokens.len(),
            filled = tokens.iter().filter(|t| t.is_filled()).count(),
            "fetched token info"
        );
        tokens
    }

    async fn fetch_batch(&self, batch: &[Address]) -> Vec<ResolvedToken> {
        match self.try_fetch_batch(batch).await {
            Ok(infos) => batch
                .iter()
                .zip(infos)
                .map(|(address, info)| ResolvedToken::with_info(*address, info))
                .collect(),
            Err(err) => {
                tracing::error!(err = ?err, addresses = ?batch, "failed to probe token batch");
                batch.iter().copied().map(ResolvedToken::new).collect()
            }
        }
    }

    async fn try_fetch_batch(&self, batch: &[Address]) -> Result<Vec<TokenInfo>, ProbeError> {
        let timeout = self.settings.probe_timeout;
        let encoded = tokio::time::timeout(timeout, self.probe.probe(batch))
            .await
            .map_err(|_| ProbeError::Timeout(timeout))??;

        let infos = decode_token_infos(&encoded).context("invalid probe return data")?;
        if infos.len() != batch.len() {
            return Err(anyhow::anyhow!(
                "probe returned {} slots for {} addresses",
                infos.len(),
                batch.len()
            )
            .into());
        }
        Ok(infos)
    }
}
