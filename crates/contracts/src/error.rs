//! Error types for the contracts crate.

use thiserror::Error;

/// Errors that can occur when using contract read clients.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The RPC URL could not be parsed.
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// RPC connection failed.
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    /// The call reverted or the target does not implement the function.
    /// This is the only call failure the resolution engine recovers from.
    #[error("Contract call reverted: {0}")]
    CallReverted(String),

    /// Any other call failure.
    #[error("Contract call failed: {0}")]
    CallFailed(String),

    /// No RPC endpoint is configured for the requested network.
    #[error("No RPC endpoint configured for network {0}")]
    UnsupportedNetwork(String),
}

impl ContractError {
    /// Whether this failure means "the address does not speak the expected
    /// interface", as opposed to an infrastructure problem.
    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::CallReverted(_))
    }
}

/// Classify an alloy contract call error. Reverts and ABI-decode failures
/// (including empty return data) indicate an unsupported call; transport
/// failures without an error response are connection problems.
pub(crate) fn classify_call_error(error: alloy::contract::Error) -> ContractError {
    match error {
        alloy::contract::Error::TransportError(rpc) => match rpc.as_error_resp() {
            Some(resp) => ContractError::CallReverted(resp.to_string()),
            None => ContractError::RpcConnection(rpc.to_string()),
        },
        alloy::contract::Error::AbiError(e) => ContractError::CallReverted(e.to_string()),
        alloy::contract::Error::ZeroData(name, _) => {
            ContractError::CallReverted(format!("empty return data for {name}"))
        }
        other => ContractError::CallFailed(other.to_string()),
    }
}

/// Result type alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_rpc_url() {
        let error = ContractError::InvalidRpcUrl("not a url".to_string());
        assert_eq!(error.to_string(), "Invalid RPC URL: not a url");
    }

    #[test]
    fn test_error_display_rpc_connection() {
        let error = ContractError::RpcConnection("connection refused".to_string());
        assert_eq!(
            error.to_string(),
            "RPC connection failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_call_reverted() {
        let error = ContractError::CallReverted("execution reverted".to_string());
        assert_eq!(
            error.to_string(),
            "Contract call reverted: execution reverted"
        );
        assert!(error.is_reverted());
    }

    #[test]
    fn test_error_display_call_failed() {
        let error = ContractError::CallFailed("out of gas".to_string());
        assert_eq!(error.to_string(), "Contract call failed: out of gas");
        assert!(!error.is_reverted());
    }
}
