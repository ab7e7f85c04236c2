//! Error types for wallet client operations.
//!
//! [`WalletError`] integrates into the global [`Error`](crate::Error)
//! hierarchy via `Error::Wallet` and into tool execution via [`ToolError`].

use crate::error::ToolError;

/// Error type for wallet client operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum WalletError {
    /// Signing error.
    #[error("Signing error: {0}")]
    Signing(String),

    /// RPC / provider error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The wallet cannot perform the operation on its chain.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl WalletError {
    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a provider error.
    #[must_use]
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

impl From<WalletError> for ToolError {
    fn from(e: WalletError) -> Self {
        Self::Execution(e.to_string())
    }
}
