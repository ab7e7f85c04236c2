//! Mock wallet client for testing.
//!
//! Returns preconfigured balances and deterministic signatures, useful for
//! unit testing plugins without a signer or an RPC endpoint.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Balance, Chain, Signature, WalletClient, WalletError};

/// A wallet client with canned responses.
///
/// # Example
///
/// ```rust,ignore
/// use goat::wallet::{Chain, MockWalletClient};
///
/// let wallet = MockWalletClient::new("0xabc", Chain::evm(1))
///     .with_native_balance("0xabc", "1.5", "1500000000000000000");
/// ```
#[derive(Debug)]
pub struct MockWalletClient {
    address: String,
    chain: Chain,
    balances: HashMap<String, Balance>,
    signed: Mutex<Vec<String>>,
    read_only: bool,
}

impl MockWalletClient {
    /// Create a mock wallet at `address` on `chain` with no known balances.
    #[must_use]
    pub fn new(address: impl Into<String>, chain: Chain) -> Self {
        Self {
            address: address.into(),
            chain,
            balances: HashMap::new(),
            signed: Mutex::new(Vec::new()),
            read_only: false,
        }
    }

    /// Refuse to sign, like a watch-only wallet.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Register the balance returned for `address`.
    #[must_use]
    pub fn with_balance(mut self, address: impl Into<String>, balance: Balance) -> Self {
        self.balances.insert(address.into(), balance);
        self
    }

    /// Register an 18-decimal native balance for `address`.
    #[must_use]
    pub fn with_native_balance(
        self,
        address: impl Into<String>,
        value: impl Into<String>,
        in_base_units: impl Into<String>,
    ) -> Self {
        self.with_balance(
            address,
            Balance {
                decimals: 18,
                symbol: "ETH".to_owned(),
                name: "Ether".to_owned(),
                value: value.into(),
                in_base_units: in_base_units.into(),
            },
        )
    }

    /// Messages signed so far, in signing order.
    #[must_use]
    pub fn signed_messages(&self) -> Vec<String> {
        self.signed
            .lock()
            .map(|signed| signed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl WalletClient for MockWalletClient {
    fn address(&self) -> &str {
        &self.address
    }

    fn chain(&self) -> &Chain {
        &self.chain
    }

    async fn sign_message(&self, message: &str) -> Result<Signature, WalletError> {
        if self.read_only {
            return Err(WalletError::unsupported(format!(
                "{} is read-only and cannot sign",
                self.address
            )));
        }
        self.signed
            .lock()
            .map_err(|_| WalletError::signing("mock signer lock poisoned"))?
            .push(message.to_owned());
        Ok(Signature {
            signature: format!("mock:{}:{message}", self.address),
        })
    }

    async fn balance_of(&self, address: &str) -> Result<Balance, WalletError> {
        self.balances
            .get(address)
            .cloned()
            .ok_or_else(|| WalletError::provider(format!("no balance known for {address}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ToolError;

    #[tokio::test]
    async fn returns_registered_balance() {
        let wallet = MockWalletClient::new("0xabc", Chain::evm(1)).with_native_balance(
            "0xdef",
            "2",
            "2000000000000000000",
        );
        let balance = wallet.balance_of("0xdef").await.unwrap();
        assert_eq!(balance.value, "2");
        assert_eq!(balance.decimals, 18);
    }

    #[tokio::test]
    async fn unknown_balance_is_provider_error() {
        let wallet = MockWalletClient::new("0xabc", Chain::Solana);
        let err = wallet.balance_of("0xnope").await.unwrap_err();
        assert!(matches!(err, WalletError::Provider(_)));
    }

    #[tokio::test]
    async fn records_signed_messages() {
        let wallet = MockWalletClient::new("0xabc", Chain::evm(1));
        let sig = wallet.sign_message("hello").await.unwrap();
        assert_eq!(sig.signature, "mock:0xabc:hello");
        assert_eq!(wallet.signed_messages(), vec!["hello".to_owned()]);
    }

    #[tokio::test]
    async fn read_only_wallet_refuses_to_sign() {
        let wallet = MockWalletClient::new("0xabc", Chain::evm(1)).read_only();
        let err = wallet.sign_message("hello").await.unwrap_err();
        assert!(matches!(err, WalletError::Unsupported(ref m) if m.contains("read-only")));
        assert!(wallet.signed_messages().is_empty());

        let tool_err = ToolError::from(err);
        assert!(
            matches!(tool_err, ToolError::Execution(ref m) if m.starts_with("Unsupported operation"))
        );
    }
}
