//! Turning providers and plugins into a flat list of bound tools.
//!
//! The collector reads each provider type's registry, binds the provider
//! instance and the runtime wallet client into every registered method, and
//! returns the tools in a stable order: core wallet tools first, then plugins
//! in input order, each plugin's providers in input order, each provider's
//! methods in registration order.
//!
//! Provider-shape problems (a type given without an instance, an instance
//! with nothing registered, a plugin that does not support the wallet's
//! chain) do not stop collection. They are logged and returned as
//! [`Diagnostic`]s alongside the tools.
//!
//! Tool names in a collection are unique. A plugin tool named like a core
//! tool takes the core tool's place; a plugin tool named like an earlier
//! plugin tool is dropped. Both are reported as
//! [`Diagnostic::DuplicateToolName`].
//!
//! # Example
//!
//! ```rust,ignore
//! use goat::collect_tools;
//!
//! let tools = collect_tools(&wallet, &[erc20_plugin, uniswap_plugin]).await?;
//! for tool in &tools {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::CollectorConfig;
use crate::error::{ConfigError, Error, Result};
use crate::plugin::SharedPlugin;
use crate::registry::{ToolProvider, registry_for, short_type_name};
use crate::tool::{Tool, ToolSet};
use crate::wallet::{SharedWalletClient, core_tools};

/// A provider handed to the collector.
///
/// Either an instance whose registered tools get bound, or just a provider
/// type, which can contribute nothing and only produces a diagnostic.
#[derive(Clone)]
pub struct ToolSource {
    kind: SourceKind,
}

#[derive(Clone)]
enum SourceKind {
    Instance(Arc<dyn ErasedProvider>),
    Unconstructed(&'static str),
}

impl ToolSource {
    /// A provider instance.
    #[must_use]
    pub fn instance<P: ToolProvider>(provider: P) -> Self {
        Self::shared(Arc::new(provider))
    }

    /// A provider instance that is already shared.
    #[must_use]
    pub fn shared<P: ToolProvider>(provider: Arc<P>) -> Self {
        Self {
            kind: SourceKind::Instance(Arc::new(ProviderInstance(provider))),
        }
    }

    /// A provider type supplied without an instance.
    #[must_use]
    pub fn unconstructed<P: ToolProvider>() -> Self {
        Self {
            kind: SourceKind::Unconstructed(short_type_name::<P>()),
        }
    }

    /// Short name of the provider type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SourceKind::Instance(provider) => provider.type_name(),
            SourceKind::Unconstructed(name) => *name,
        }
    }

    /// Whether an instance was supplied.
    #[must_use]
    pub const fn is_instance(&self) -> bool {
        matches!(self.kind, SourceKind::Instance(_))
    }
}

impl fmt::Debug for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SourceKind::Instance(provider) => f
                .debug_tuple("ToolSource::Instance")
                .field(&provider.type_name())
                .finish(),
            SourceKind::Unconstructed(name) => f
                .debug_tuple("ToolSource::Unconstructed")
                .field(name)
                .finish(),
        }
    }
}

trait ErasedProvider: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn bind_tools(
        &self,
        wallet: &SharedWalletClient,
    ) -> std::result::Result<Vec<Tool>, ConfigError>;
}

struct ProviderInstance<P>(Arc<P>);

impl<P: ToolProvider> ErasedProvider for ProviderInstance<P> {
    fn type_name(&self) -> &'static str {
        short_type_name::<P>()
    }

    fn bind_tools(
        &self,
        wallet: &SharedWalletClient,
    ) -> std::result::Result<Vec<Tool>, ConfigError> {
        Ok(registry_for::<P>()?.bind_all(&self.0, wallet))
    }
}

/// A non-fatal problem found while collecting tools.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// A provider type was supplied without an instance.
    UnconstructedProvider {
        /// Provider type name.
        provider: String,
    },
    /// A provider instance has no registered tools.
    NoRegisteredTools {
        /// Provider type name.
        provider: String,
    },
    /// A plugin was skipped because it does not support the wallet's chain.
    UnsupportedChain {
        /// Plugin name.
        plugin: String,
        /// The wallet's chain.
        chain: String,
    },
    /// A plugin contributed a tool whose name was already taken.
    DuplicateToolName {
        /// Tool name.
        name: String,
        /// Plugin that contributed the duplicate.
        plugin: String,
        /// The duplicate replaced a core wallet tool instead of being
        /// dropped.
        overrides_core: bool,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnconstructedProvider { provider } => write!(
                f,
                "Tool provider '{provider}' was supplied as a type, not an instance; skipping it"
            ),
            Self::NoRegisteredTools { provider } => {
                write!(f, "No tools found for provider '{provider}'")
            }
            Self::UnsupportedChain { plugin, chain } => {
                write!(f, "Plugin '{plugin}' does not support {chain}; skipping it")
            }
            Self::DuplicateToolName {
                name,
                plugin,
                overrides_core: true,
            } => write!(
                f,
                "Plugin '{plugin}' tool '{name}' replaces the core tool of the same name"
            ),
            Self::DuplicateToolName {
                name,
                plugin,
                overrides_core: false,
            } => write!(
                f,
                "Plugin '{plugin}' tool '{name}' duplicates an earlier tool; skipping it"
            ),
        }
    }
}

/// Tools produced by a collection pass, plus any diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ToolCollection {
    /// Bound tools, in collection order.
    pub tools: Vec<Tool>,
    /// Non-fatal problems, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl ToolCollection {
    /// Append another collection.
    pub fn extend(&mut self, other: Self) {
        self.tools.extend(other.tools);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Record a diagnostic and log it.
    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// The tools as a name-indexed [`ToolSet`].
    #[must_use]
    pub fn into_tool_set(self) -> ToolSet {
        self.tools.into()
    }
}

impl From<Vec<Tool>> for ToolCollection {
    fn from(tools: Vec<Tool>) -> Self {
        Self {
            tools,
            diagnostics: Vec::new(),
        }
    }
}

/// Bind the registered tools of `sources` to `wallet`.
///
/// Sources are visited in order. A type without an instance, or an instance
/// with nothing registered, contributes no tools and a diagnostic.
///
/// # Errors
///
/// Returns the [`ConfigError`] of the first provider type whose tools are
/// declared incorrectly.
pub fn collect_provider_tools(
    wallet: &SharedWalletClient,
    sources: &[ToolSource],
) -> std::result::Result<ToolCollection, ConfigError> {
    let mut collection = ToolCollection::default();

    for source in sources {
        match &source.kind {
            SourceKind::Unconstructed(name) => {
                collection.diagnose(Diagnostic::UnconstructedProvider {
                    provider: (*name).to_owned(),
                });
            }
            SourceKind::Instance(provider) => {
                let tools = provider.bind_tools(wallet)?;
                if tools.is_empty() {
                    collection.diagnose(Diagnostic::NoRegisteredTools {
                        provider: provider.type_name().to_owned(),
                    });
                } else {
                    debug!(
                        provider = provider.type_name(),
                        tools = tools.len(),
                        "Bound provider tools"
                    );
                    collection.tools.extend(tools);
                }
            }
        }
    }

    Ok(collection)
}

/// Who holds a tool name during a collection pass.
#[derive(Debug, Clone, Copy)]
enum Claim {
    /// A core tool, at this position in the collection.
    Core(usize),
    Plugin,
}

/// Name-uniqueness bookkeeping for one collection pass.
#[derive(Debug, Default)]
struct NameClaims(HashMap<String, Claim>);

impl NameClaims {
    fn core(tools: &[Tool]) -> Self {
        Self(
            tools
                .iter()
                .enumerate()
                .map(|(index, tool)| (tool.name().to_owned(), Claim::Core(index)))
                .collect(),
        )
    }

    /// Add a plugin tool to `collection` unless its name is taken by an
    /// earlier plugin tool.
    fn admit(&mut self, collection: &mut ToolCollection, plugin: &str, tool: Tool) {
        let name = tool.name().to_owned();
        match self.0.get(&name).copied() {
            None => {
                self.0.insert(name, Claim::Plugin);
                collection.tools.push(tool);
            }
            Some(Claim::Core(index)) => {
                collection.tools[index] = tool;
                self.0.insert(name.clone(), Claim::Plugin);
                collection.diagnose(Diagnostic::DuplicateToolName {
                    name,
                    plugin: plugin.to_owned(),
                    overrides_core: true,
                });
            }
            Some(Claim::Plugin) => {
                collection.diagnose(Diagnostic::DuplicateToolName {
                    name,
                    plugin: plugin.to_owned(),
                    overrides_core: false,
                });
            }
        }
    }
}

/// Collects tools from plugins for a wallet client.
#[derive(Debug, Clone, Default)]
pub struct ToolCollector {
    config: CollectorConfig,
}

impl ToolCollector {
    /// A collector with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every collection pass.
    #[must_use]
    pub const fn with_config(mut self, config: CollectorConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect the tools of `plugins` for `wallet`.
    ///
    /// Plugins that do not support the wallet's chain are skipped with a
    /// diagnostic. The remaining plugins are visited one at a time, in
    /// order. Tool names stay unique; duplicates are reported as
    /// [`Diagnostic::DuplicateToolName`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a provider declares its tools
    /// incorrectly, and [`Error::Plugin`] if a plugin fails otherwise.
    pub async fn collect(
        &self,
        wallet: &SharedWalletClient,
        plugins: &[SharedPlugin],
    ) -> Result<ToolCollection> {
        let chain = wallet.chain();
        let mut collection = ToolCollection::default();

        if self.config.core_tools {
            collection.tools.extend(core_tools(wallet));
        }
        let mut claims = NameClaims::core(&collection.tools);

        for plugin in plugins {
            if !plugin.supports_chain(chain) {
                collection.diagnose(Diagnostic::UnsupportedChain {
                    plugin: plugin.name().to_owned(),
                    chain: chain.to_string(),
                });
                continue;
            }

            let contributed = plugin.tools(wallet).await.map_err(|e| match e {
                Error::Config(_) | Error::Plugin { .. } => e,
                other => Error::plugin(plugin.name(), other.to_string()),
            })?;
            debug!(
                plugin = plugin.name(),
                tools = contributed.tools.len(),
                "Collected plugin tools"
            );
            collection.diagnostics.extend(contributed.diagnostics);
            for tool in contributed.tools {
                claims.admit(&mut collection, plugin.name(), tool);
            }
        }

        if self.config.strict_definitions || self.config.describe_parameters {
            let config = self.config;
            collection.tools = collection
                .tools
                .into_iter()
                .map(|tool| {
                    let tool = tool.with_strict(config.strict_definitions);
                    if config.describe_parameters {
                        tool.with_parameter_docs()
                    } else {
                        tool
                    }
                })
                .collect();
        }

        info!(
            chain = %chain,
            plugins = plugins.len(),
            tools = collection.tools.len(),
            diagnostics = collection.diagnostics.len(),
            "Collected tools"
        );
        Ok(collection)
    }
}

/// Collect the core wallet tools and the tools of `plugins` for `wallet`,
/// with the default configuration.
///
/// # Errors
///
/// See [`ToolCollector::collect`].
pub async fn collect_tools(
    wallet: &SharedWalletClient,
    plugins: &[SharedPlugin],
) -> Result<Vec<Tool>> {
    let collection = ToolCollector::new().collect(wallet, plugins).await?;
    Ok(collection.tools)
}
