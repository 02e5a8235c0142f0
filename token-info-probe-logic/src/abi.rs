//! Encoding of the probe result and decoding of `symbol()` / `decimals()` return data.
//!
//! The probe result is the bare ABI encoding of `(string,uint8)[]`: the array length word comes
//! first, followed by one offset word per element and the element tails. There is no leading
//! offset word pointing at the array itself, which is what a generic "encode these top-level
//! values" routine would emit.

use alloy::{
    primitives::{Bytes, U256},
    sol,
    sol_types::{SolCall, SolType, sol_data},
};

use crate::{error::DecodeError, types::TokenInfo};

sol! {
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
}

/// `(string,uint8)[]`
type TokenInfoArray = sol_data::Array<(sol_data::String, sol_data::Uint<8>)>;

pub const WORD: usize = 32;

pub const SYMBOL_SELECTOR: [u8; 4] = <symbolCall as SolCall>::SELECTOR;
pub const DECIMALS_SELECTOR: [u8; 4] = <decimalsCall as SolCall>::SELECTOR;

/// Encodes the slots as `(string,uint8)[]`, starting at the length word.
pub fn encode_token_infos(infos: &[TokenInfo]) -> Bytes {
    let values: Vec<(String, u8)> = infos
        .iter()
        .map(|info| (info.symbol.clone(), info.decimals))
        .collect();
    // a standalone dynamic value is preceded by the offset word pointing at it
    let mut encoded = TokenInfoArray::abi_encode(&values);
    encoded.split_off(WORD).into()
}

/// Decodes a buffer produced by [`encode_token_infos`].
///
/// Symbols must be valid UTF-8 and decimals must fit in a byte; trailing bytes are ignored.
pub fn decode_token_infos(data: &[u8]) -> Result<Vec<TokenInfo>, DecodeError> {
    let mut wrapped = Vec::with_capacity(WORD + data.len());
    wrapped.extend_from_slice(&U256::from(WORD as u64).to_be_bytes::<WORD>());
    wrapped.extend_from_slice(data);

    let values = TokenInfoArray::abi_decode_validate(&wrapped)?;
    Ok(values
        .into_iter()
        .map(|(symbol, decimals)| TokenInfo { symbol, decimals })
        .collect())
}
