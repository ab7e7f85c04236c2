//! Per-provider-type tool metadata.
//!
//! A provider type declares its tool methods once, through
//! [`ToolProvider::describe_tools`] (usually generated by the `#[tools]`
//! attribute). The resulting [`ToolMetadataRegistry`] is cached per type for
//! the lifetime of the process and read by the collector every time it binds
//! tools to a wallet client.
//!
//! # Example
//!
//! ```rust,ignore
//! use goat::registry::{MethodSignature, ToolMetadataRegistry, ToolOptions, ToolProvider};
//!
//! struct PriceService;
//!
//! impl ToolProvider for PriceService {
//!     fn describe_tools(registry: &mut ToolMetadataRegistry<Self>) -> Result<(), ConfigError> {
//!         registry.tool("getPrice", ToolOptions::new("Get a token price"), |svc, p: PriceParams| async move {
//!             svc.price(p).await
//!         })?;
//!         Ok(())
//!     }
//! }
//! ```

mod arguments;
mod signature;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

pub use arguments::{ToolArgument, ToolArguments, ToolTarget};
pub use signature::{
    DeclaredParam, MethodSignature, ParametersSlot, ResolvedSlots, ToolOptions, WalletClientSlot,
};

use crate::error::ConfigError;
use crate::schema::ToolParameters;
use crate::tool::{Tool, ToolConfig, ToolResult, create_tool, to_output_value};
use crate::wallet::SharedWalletClient;

/// A type whose methods are exposed as tools.
pub trait ToolProvider: Send + Sync + Sized + 'static {
    /// Register every tool method of the type.
    ///
    /// Called once per type, the first time its registry is needed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a method is declared incorrectly.
    fn describe_tools(registry: &mut ToolMetadataRegistry<Self>) -> Result<(), ConfigError>;
}

/// Everything needed to turn one provider method into a bound [`Tool`].
#[derive(Debug, Clone)]
pub struct StoredToolMetadata<P> {
    method: String,
    name: String,
    description: String,
    arity: usize,
    parameters_slot: ParametersSlot,
    wallet_client_slot: Option<WalletClientSlot>,
    target: ToolTarget<P>,
}

impl<P: Send + Sync + 'static> StoredToolMetadata<P> {
    /// Method the entry was registered for.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of declared arguments.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Where the validated parameters go.
    #[must_use]
    pub const fn parameters_slot(&self) -> &ParametersSlot {
        &self.parameters_slot
    }

    /// Where the wallet client goes, if anywhere.
    #[must_use]
    pub const fn wallet_client_slot(&self) -> Option<WalletClientSlot> {
        self.wallet_client_slot
    }

    /// The unbound callable.
    #[must_use]
    pub const fn target(&self) -> &ToolTarget<P> {
        &self.target
    }

    /// Bind `provider` and `wallet` into a callable tool.
    ///
    /// Each execution validates the input against the parameters schema,
    /// fills the argument list (wallet client at its slot, parameters at
    /// theirs) and invokes the target on the provider.
    #[must_use]
    pub fn bind(&self, provider: &Arc<P>, wallet: &SharedWalletClient) -> Tool {
        let provider = Arc::clone(provider);
        let wallet = Arc::clone(wallet);
        let target = self.target.clone();
        let schema = self.parameters_slot.schema.clone();
        let parameters_index = self.parameters_slot.index;
        let wallet_slot = self.wallet_client_slot;
        let arity = self.arity;
        let name = self.name.clone();

        let config = ToolConfig::new(
            self.name.clone(),
            self.description.clone(),
            self.parameters_slot.schema.clone(),
        );

        create_tool(config, move |parameters| {
            debug!(tool = %name, "Executing tool");
            let call = schema.validate(&parameters).map(|()| {
                let mut arguments = ToolArguments::with_len(arity);
                if let Some(slot) = wallet_slot {
                    arguments.set(slot.index, ToolArgument::WalletClient(Arc::clone(&wallet)));
                }
                arguments.set(parameters_index, ToolArgument::Parameters(parameters));
                target.invoke(Arc::clone(&provider), arguments)
            });
            async move { call?.await }
        })
    }
}

/// Insertion-ordered tool metadata of one provider type.
#[derive(Debug)]
pub struct ToolMetadataRegistry<P> {
    provider: &'static str,
    entries: Vec<StoredToolMetadata<P>>,
}

impl<P: Send + Sync + 'static> Default for ToolMetadataRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + Sync + 'static> ToolMetadataRegistry<P> {
    /// An empty registry for `P`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: short_type_name::<P>(),
            entries: Vec::new(),
        }
    }

    /// Short name of the provider type.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Register a tool method.
    ///
    /// Registering the same method again replaces the earlier entry in place.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the signature cannot be resolved or the
    /// description is empty. The registry is left unchanged.
    pub fn register(
        &mut self,
        options: ToolOptions,
        signature: MethodSignature,
        target: ToolTarget<P>,
    ) -> Result<&mut Self, ConfigError> {
        let slots = signature.resolve(self.provider)?;
        if options.description().trim().is_empty() {
            return Err(ConfigError::EmptyDescription {
                provider: self.provider.to_owned(),
                method: signature.method().to_owned(),
            });
        }

        let entry = StoredToolMetadata {
            method: signature.method().to_owned(),
            name: options.resolve_name(signature.method()),
            description: options.description().to_owned(),
            arity: slots.arity,
            parameters_slot: slots.parameters,
            wallet_client_slot: slots.wallet_client,
            target,
        };

        debug!(
            provider = self.provider,
            method = %entry.method,
            tool = %entry.name,
            "Registered tool"
        );

        match self.entries.iter().position(|e| e.method == entry.method) {
            Some(position) => self.entries[position] = entry,
            None => self.entries.push(entry),
        }
        Ok(self)
    }

    /// Register a method taking only a parameters object.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn tool<T, O, F, Fut>(
        &mut self,
        method: &str,
        options: ToolOptions,
        call: F,
    ) -> Result<&mut Self, ConfigError>
    where
        T: ToolParameters,
        O: Serialize + Send + 'static,
        F: Fn(Arc<P>, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<O>> + Send + 'static,
    {
        let target = ToolTarget::new(move |provider: Arc<P>, arguments: ToolArguments| {
            let pending = arguments
                .parameters::<T>(0)
                .map(|parameters| call(provider, parameters));
            async move { to_output_value(pending?.await?) }
        });
        self.register(
            options,
            MethodSignature::new(method).parameters::<T>(),
            target,
        )
    }

    /// Register a method taking the wallet client followed by a parameters
    /// object.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn wallet_tool<T, O, F, Fut>(
        &mut self,
        method: &str,
        options: ToolOptions,
        call: F,
    ) -> Result<&mut Self, ConfigError>
    where
        T: ToolParameters,
        O: Serialize + Send + 'static,
        F: Fn(Arc<P>, SharedWalletClient, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<O>> + Send + 'static,
    {
        let target = ToolTarget::new(move |provider: Arc<P>, arguments: ToolArguments| {
            let pending = arguments.wallet_client(0).and_then(|wallet| {
                arguments
                    .parameters::<T>(1)
                    .map(|parameters| call(provider, wallet, parameters))
            });
            async move { to_output_value(pending?.await?) }
        });
        self.register(
            options,
            MethodSignature::new(method)
                .wallet_client()
                .parameters::<T>(),
            target,
        )
    }

    /// Entry registered for `method`.
    #[must_use]
    pub fn get(&self, method: &str) -> Option<&StoredToolMetadata<P>> {
        self.entries.iter().find(|e| e.method == method)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredToolMetadata<P>> {
        self.entries.iter()
    }

    /// Tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind every entry to `provider` and `wallet`, in registration order.
    #[must_use]
    pub fn bind_all(&self, provider: &Arc<P>, wallet: &SharedWalletClient) -> Vec<Tool> {
        self.entries
            .iter()
            .map(|entry| entry.bind(provider, wallet))
            .collect()
    }
}

type RegistryCache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

fn cache() -> &'static RegistryCache {
    static CACHE: OnceLock<RegistryCache> = OnceLock::new();
    CACHE.get_or_init(RwLock::default)
}

/// The registry of provider type `P`, built on first use.
///
/// Registries are built outside the cache lock and published whole, so
/// readers never observe a partially populated one. A failed build is not
/// cached and is reported again on the next call.
///
/// # Errors
///
/// Returns the [`ConfigError`] raised by `P::describe_tools`.
pub fn registry_for<P: ToolProvider>() -> Result<Arc<ToolMetadataRegistry<P>>, ConfigError> {
    let key = TypeId::of::<P>();

    let cached = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(registry) = cached.and_then(|any| any.downcast().ok()) {
        return Ok(registry);
    }

    let mut registry = ToolMetadataRegistry::<P>::new();
    P::describe_tools(&mut registry)?;
    debug!(
        provider = registry.provider(),
        tools = registry.len(),
        "Built tool metadata registry"
    );
    let fresh = Arc::new(registry);

    let published = {
        let mut cache = cache().write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(key)
                .or_insert_with(|| Arc::clone(&fresh) as Arc<dyn Any + Send + Sync>),
        )
    };
    Ok(published.downcast().unwrap_or(fresh))
}

/// Last path segment of `T`'s type name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
