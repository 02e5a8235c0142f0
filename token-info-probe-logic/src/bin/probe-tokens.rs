use alloy::primitives::Address;
use anyhow::{Context, Result, anyhow};
use token_info_probe_logic::{RpcContractReader, Settings, TokenInfoBatcher, TokenInfoProbe};

fn usage() -> &'static str {
    "Usage:\n  cargo run --bin probe-tokens -- <address>... [--raw]\n\nExamples:\n  probe-tokens 0xdAC17F958D2ee523a2206206994597C13D831ec7\n  probe-tokens 0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2 0x0000000000000000000000000000000000000001 --raw\n\nEnv:\n  TOKEN_INFO_PROBE__RPC_URL=http://127.0.0.1:8545\n  TOKEN_INFO_PROBE__PROBE__CONCURRENCY=10\n  TOKEN_INFO_PROBE__BATCH__BATCH_SIZE=150\n  TOKEN_INFO_PROBE__CONFIG=path/to/config.toml   (optional)\n"
}

struct Args {
    addresses: Vec<Address>,
    raw: bool,
}

fn parse_args() -> Result<Args> {
    let mut addresses = Vec::new();
    let mut raw = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--raw" => raw = true,
            "-h" | "--help" => return Err(anyhow!("{}", usage())),
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {other}\n\n{}", usage()));
            }
            other => {
                let address = other
                    .trim()
                    .parse::<Address>()
                    .with_context(|| format!("invalid address: {other}"))?;
                addresses.push(address);
            }
        }
    }

    if addresses.is_empty() {
        return Err(anyhow!("missing <address>\n\n{}", usage()));
    }

    Ok(Args { addresses, raw })
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = parse_args()?;
    let settings = Settings::build().context("failed to load settings")?;

    let reader = RpcContractReader::from_url(settings.rpc_url.clone());
    let probe = TokenInfoProbe::new(reader, settings.probe.clone());

    if args.raw {
        let encoded = probe.probe(&args.addresses).await?;
        println!("0x{}", hex::encode(&encoded));
        return Ok(());
    }

    let batcher = TokenInfoBatcher::new(probe, settings.batch.clone());
    for token in batcher.fetch(args.addresses).await {
        let symbol = if token.is_filled() {
            token.symbol.as_str()
        } else {
            "<none>"
        };
        println!("{}  {:>3}  {}", token.address, token.decimals, symbol);
    }

    Ok(())
}
