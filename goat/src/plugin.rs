//! Plugins: named bundles of tool providers.
//!
//! A [`Plugin`] reports which chains it supports and which providers it
//! contributes. The default [`Plugin::tools`] binds the providers' registered
//! tools to the wallet client; plugins that need network state to decide
//! which tools to offer override it.
//!
//! # Example
//!
//! ```rust,ignore
//! use goat::plugin::ProviderPlugin;
//! use goat::collector::ToolSource;
//!
//! let erc20 = ProviderPlugin::new("erc20", vec![ToolSource::instance(Erc20Service::new(tokens))])
//!     .supporting(|chain| chain.is_evm());
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::collector::{ToolCollection, ToolSource, collect_provider_tools};
use crate::error::Result;
use crate::wallet::{Chain, SharedWalletClient};

/// A plugin shared between collection passes.
pub type SharedPlugin = Arc<dyn Plugin>;

/// A named bundle of tool providers.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Plugin name, used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the plugin can operate on `chain`.
    ///
    /// Plugins returning `false` are skipped by the collector.
    fn supports_chain(&self, chain: &Chain) -> bool;

    /// Providers whose registered tools the plugin contributes.
    fn tool_providers(&self) -> Vec<ToolSource> {
        Vec::new()
    }

    /// Build the plugin's tools for `wallet`.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider declares its tools incorrectly, or if
    /// an override fails to gather what it needs.
    async fn tools(&self, wallet: &SharedWalletClient) -> Result<ToolCollection> {
        Ok(collect_provider_tools(wallet, &self.tool_providers())?)
    }
}

type ChainFilter = Arc<dyn Fn(&Chain) -> bool + Send + Sync>;

/// A plugin made of a fixed list of providers.
#[derive(Clone)]
pub struct ProviderPlugin {
    name: String,
    providers: Vec<ToolSource>,
    chains: ChainFilter,
}

impl ProviderPlugin {
    /// A plugin supporting every chain.
    #[must_use]
    pub fn new(name: impl Into<String>, providers: Vec<ToolSource>) -> Self {
        Self {
            name: name.into(),
            providers,
            chains: Arc::new(|_| true),
        }
    }

    /// Restrict the plugin to chains accepted by `filter`.
    #[must_use]
    pub fn supporting<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Chain) -> bool + Send + Sync + 'static,
    {
        self.chains = Arc::new(filter);
        self
    }

    /// Add a provider.
    #[must_use]
    pub fn with_provider(mut self, provider: ToolSource) -> Self {
        self.providers.push(provider);
        self
    }
}

impl fmt::Debug for ProviderPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderPlugin")
            .field("name", &self.name)
            .field("providers", &self.providers)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Plugin for ProviderPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_chain(&self, chain: &Chain) -> bool {
        (self.chains)(chain)
    }

    fn tool_providers(&self) -> Vec<ToolSource> {
        self.providers.clone()
    }
}
