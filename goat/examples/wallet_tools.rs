//! Collecting wallet tools from a plugin and calling them.
//!
//! Uses the in-memory mock wallet, so no RPC endpoint is needed.
//!
//! ```bash
//! RUST_LOG=goat=debug cargo run --example wallet_tools
//! ```

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use goat::prelude::*;

#[derive(Debug, Deserialize, JsonSchema)]
struct BalanceParams {
    /// The address to query.
    address: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SignParams {
    /// Message to sign.
    message: String,
}

#[derive(Debug, Default)]
struct WalletOpsService;

#[tools]
impl WalletOpsService {
    /// Get the native balance of any address.
    #[tool]
    async fn balance_of(
        &self,
        wallet: &dyn WalletClient,
        params: BalanceParams,
    ) -> Result<Balance, WalletError> {
        wallet.balance_of(&params.address).await
    }

    /// Sign a message with the connected wallet.
    #[tool(name = "sign_message")]
    async fn sign(
        &self,
        wallet: &dyn WalletClient,
        params: SignParams,
    ) -> Result<Signature, WalletError> {
        wallet.sign_message(&params.message).await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goat=info".into()),
        )
        .init();

    let wallet: SharedWalletClient = Arc::new(
        MockWalletClient::new("0x71C7656EC7ab88b098defB751B7401B5f6d8976F", Chain::evm(8453))
            .with_native_balance(
                "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
                "0.42",
                "420000000000000000",
            ),
    );

    let plugins: Vec<SharedPlugin> = vec![Arc::new(
        ProviderPlugin::new("wallet-ops", vec![ToolSource::instance(WalletOpsService)])
            .supporting(Chain::is_evm),
    )];

    let collection = ToolCollector::new()
        .with_config(CollectorConfig::new().strict_definitions(true))
        .collect(&wallet, &plugins)
        .await?;

    for diagnostic in &collection.diagnostics {
        println!("diagnostic: {diagnostic}");
    }

    let tools = collection.into_tool_set();
    for definition in tools.definitions() {
        println!("{}", serde_json::to_string_pretty(&definition)?);
    }

    let own = tools.call("get_balance", json!({})).await?;
    println!("\nget_balance -> {own}");

    let balance = tools
        .call(
            "balance_of",
            json!({"address": "0x71C7656EC7ab88b098defB751B7401B5f6d8976F"}),
        )
        .await?;
    println!("balance_of -> {balance}");

    let signature = tools
        .call("sign_message", json!({"message": "hello from goat"}))
        .await?;
    println!("sign_message -> {signature}");

    Ok(())
}
