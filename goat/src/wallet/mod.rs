//! Wallet client abstraction bound into tools at collection time.
//!
//! A [`WalletClient`] is the runtime chain-interaction client handed to
//! [`collect_tools`](crate::collect_tools). Provider methods that declare a
//! wallet client argument receive it in their wallet-client slot, and the
//! collector always contributes the core tools built by [`core_tools`].
//!
//! Concrete clients (EVM, Solana, Safe...) live outside this crate; they only
//! need to implement [`WalletClient`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use goat::wallet::{Chain, MockWalletClient, SharedWalletClient};
//!
//! let wallet: SharedWalletClient = Arc::new(MockWalletClient::new("0xabc", Chain::evm(8453)));
//! assert_eq!(wallet.chain().name(), "base");
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod error;
mod mock;
mod tools;

pub use error::WalletError;
pub use mock::MockWalletClient;
pub use tools::core_tools;

/// A wallet client shared between every tool bound to it.
pub type SharedWalletClient = Arc<dyn WalletClient>;

/// The chain a wallet client operates on.
///
/// Serializes as `{"type": "evm", "id": 1}` / `{"type": "solana"}`.
///
/// # Examples
///
/// ```rust
/// use goat::wallet::Chain;
///
/// let chain = Chain::evm(1);
/// assert_eq!(chain.kind(), "evm");
/// assert_eq!(chain.id(), Some(1));
/// assert_eq!(chain.name(), "ethereum");
///
/// assert_eq!(Chain::evm(999).name(), "evm-999");
/// assert_eq!(Chain::Solana.to_string(), "solana");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Chain {
    /// An EVM-compatible chain, identified by its chain ID.
    Evm {
        /// Numeric chain ID.
        id: u64,
    },
    /// Solana.
    Solana,
    /// Aptos.
    Aptos,
    /// Chromia.
    Chromia,
    /// Fuel.
    Fuel,
    /// Sui.
    Sui,
    /// Zilliqa.
    Zilliqa,
    /// A Cosmos SDK chain.
    Cosmos,
}

impl Chain {
    /// Create an EVM chain with the given chain ID.
    #[must_use]
    pub const fn evm(id: u64) -> Self {
        Self::Evm { id }
    }

    /// The chain family (`"evm"`, `"solana"`, ...).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Evm { .. } => "evm",
            Self::Solana => "solana",
            Self::Aptos => "aptos",
            Self::Chromia => "chromia",
            Self::Fuel => "fuel",
            Self::Sui => "sui",
            Self::Zilliqa => "zilliqa",
            Self::Cosmos => "cosmos",
        }
    }

    /// Numeric chain ID, for EVM chains.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        match self {
            Self::Evm { id } => Some(*id),
            _ => None,
        }
    }

    /// Whether this is an EVM-compatible chain.
    #[must_use]
    pub const fn is_evm(&self) -> bool {
        matches!(self, Self::Evm { .. })
    }

    /// Human-readable network name.
    ///
    /// Well-known EVM chain IDs map to their network name; other EVM chains
    /// render as `evm-<id>`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Evm { id } => match id {
                1 => "ethereum".to_owned(),
                10 => "optimism".to_owned(),
                56 => "bsc".to_owned(),
                137 => "polygon".to_owned(),
                8453 => "base".to_owned(),
                42_161 => "arbitrum".to_owned(),
                43_114 => "avalanche".to_owned(),
                84_532 => "base-sepolia".to_owned(),
                11_155_111 => "sepolia".to_owned(),
                other => format!("evm-{other}"),
            },
            other => other.kind().to_owned(),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evm { id } => write!(f, "{} ({id})", self.name()),
            other => f.write_str(other.kind()),
        }
    }
}

/// Balance of an address in the chain's native token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Number of decimals of the token.
    pub decimals: u8,
    /// Token symbol (e.g. `ETH`).
    pub symbol: String,
    /// Token name (e.g. `Ether`).
    pub name: String,
    /// Balance in display units (e.g. `"1.5"`).
    pub value: String,
    /// Balance in base units (e.g. wei).
    pub in_base_units: String,
}

/// A message signature produced by a wallet client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Encoded signature.
    pub signature: String,
}

/// Chain-agnostic wallet client.
///
/// Implemented by every chain-specific client so that tools and the collector
/// can treat them uniformly.
#[async_trait]
pub trait WalletClient: Send + Sync + fmt::Debug {
    /// Display-friendly address of the wallet.
    fn address(&self) -> &str;

    /// The chain the wallet is connected to.
    fn chain(&self) -> &Chain;

    /// Sign an arbitrary message.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing operation fails.
    async fn sign_message(&self, message: &str) -> Result<Signature, WalletError>;

    /// Native token balance of `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance cannot be fetched.
    async fn balance_of(&self, address: &str) -> Result<Balance, WalletError>;
}
