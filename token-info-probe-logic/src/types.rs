use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Advisory token metadata reported by a contract.
///
/// The default value (`""`, `0`) is also what a slot holds when probing failed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// How far the probe got for one address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The address has no deployed code.
    NoCode,
    /// `symbol()` could not be called or decoded; the slot is left default.
    SymbolFailed,
    /// `symbol()` succeeded but `decimals()` did not; `decimals` is left zero.
    DecimalsFailed,
    Complete,
}

/// A probed slot together with the reason it looks the way it does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbedToken {
    pub address: Address,
    pub info: TokenInfo,
    pub status: ProbeStatus,
}

impl ProbedToken {
    pub fn empty(address: Address, status: ProbeStatus) -> Self {
        Self {
            address,
            info: TokenInfo::default(),
            status,
        }
    }
}

/// Token metadata resolved by the batch client, keyed by the address it was requested for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedToken {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl ResolvedToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    pub fn with_info(address: Address, info: TokenInfo) -> Self {
        Self {
            address,
            symbol: info.symbol,
            decimals: info.decimals,
        }
    }

    /// Returns true if the contract reported a non-empty symbol.
    pub fn is_filled(&self) -> bool {
        !self.symbol.is_empty()
    }

    pub fn is_invalid(&self) -> bool {
        self.address.is_zero() || self.symbol.is_empty()
    }
}

impl From<Address> for ResolvedToken {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}
