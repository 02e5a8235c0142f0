pub mod abi;
mod batch;
mod client;
mod error;
mod probe;
pub mod rpc;
pub mod settings;
#[cfg(test)]
pub mod test_utils;
mod types;

pub use batch::TokenInfoBatcher;
pub use client::{ContractReader, TokenClient};
pub use error::{CallError, DecodeError, ProbeError};
pub use probe::TokenInfoProbe;
pub use rpc::{RpcContractReader, build_http_provider};
pub use settings::{BatchSettings, ProbeSettings, Settings};
pub use types::{ProbeStatus, ProbedToken, ResolvedToken, TokenInfo};
