use thiserror::Error;

/// Failure to interpret ABI-encoded bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(String);

impl From<alloy::sol_types::Error> for DecodeError {
    fn from(err: alloy::sol_types::Error) -> Self {
        Self(err.to_string())
    }
}

/// Failure of a single read-only call against one address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The callee rejected the call: reverted, missing entry point, bad opcode.
    #[error("call reverted: {0}")]
    Reverted(String),
    /// The call succeeded but its return data has an unexpected shape.
    #[error("invalid return data: {0}")]
    Decode(#[from] DecodeError),
    /// The node could not be reached or answered with garbage.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CallError {
    /// Per-field failures are recovered locally; everything else aborts the invocation.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CallError::Transport(_))
    }
}

/// Failure of a whole probe invocation.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("execution environment failure: {0}")]
    Environment(#[from] CallError),
    #[error("probe timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
