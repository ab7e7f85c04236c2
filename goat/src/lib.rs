//! GOAT - tool plumbing for onchain agents
//!
//! This crate turns wallet operations and third-party integrations into tools
//! an LLM agent can call. Plugin authors describe their tool methods once per
//! provider type; at request time the collector binds a wallet client into
//! every method and hands the agent a flat list of [`Tool`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use goat::prelude::*;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct BalanceParams {
//!     /// The address to query.
//!     address: String,
//! }
//!
//! struct WalletOpsService;
//!
//! #[tools]
//! impl WalletOpsService {
//!     /// Get the native balance of an address.
//!     #[tool]
//!     async fn get_balance(
//!         &self,
//!         wallet: &dyn WalletClient,
//!         params: BalanceParams,
//!     ) -> Result<Balance, WalletError> {
//!         wallet.balance_of(&params.address).await
//!     }
//! }
//!
//! let plugin: SharedPlugin = Arc::new(ProviderPlugin::new(
//!     "wallet-ops",
//!     vec![ToolSource::instance(WalletOpsService)],
//! ));
//! let tools = collect_tools(&wallet, &[plugin]).await?;
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod plugin;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod wallet;

pub use collector::{
    Diagnostic, ToolCollection, ToolCollector, ToolSource, collect_provider_tools, collect_tools,
};
pub use config::CollectorConfig;
pub use error::{ConfigError, Error, Result, ToolError};
pub use plugin::{Plugin, ProviderPlugin, SharedPlugin};
pub use registry::{ToolProvider, registry_for};
pub use schema::ParameterSchema;
pub use tool::{Tool, ToolConfig, ToolDefinition, ToolSet, create_sync_tool, create_tool};

// Re-exported so providers derive `JsonSchema` against the same version.
pub use schemars;

#[cfg(feature = "derive")]
pub use goat_derive::tools;
