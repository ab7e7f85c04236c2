//! Positional argument lists handed to tool targets.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolError;
use crate::schema::decode_parameters;
use crate::tool::{ToolFuture, ToolResult};
use crate::wallet::SharedWalletClient;

/// A value placed in one argument slot.
#[derive(Debug, Clone)]
pub enum ToolArgument {
    /// The runtime wallet client.
    WalletClient(SharedWalletClient),
    /// The validated parameters object.
    Parameters(Value),
}

/// The argument list built for one tool invocation.
///
/// Slots are filled by position; a target reads back the slots it declared.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    slots: Vec<Option<ToolArgument>>,
}

impl ToolArguments {
    /// An argument list with `len` empty slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the list has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Place `argument` at `index`, growing the list if needed.
    pub fn set(&mut self, index: usize, argument: ToolArgument) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(argument);
    }

    /// The argument at `index`, if filled.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ToolArgument> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// The wallet client at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ArgumentSlot`] if the slot is empty or holds
    /// something else.
    pub fn wallet_client(&self, index: usize) -> ToolResult<SharedWalletClient> {
        match self.get(index) {
            Some(ToolArgument::WalletClient(wallet)) => Ok(Arc::clone(wallet)),
            _ => Err(ToolError::argument_slot(index, "wallet client")),
        }
    }

    /// The raw parameters object at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ArgumentSlot`] if the slot is empty or holds
    /// something else.
    pub fn raw_parameters(&self, index: usize) -> ToolResult<&Value> {
        match self.get(index) {
            Some(ToolArgument::Parameters(value)) => Ok(value),
            _ => Err(ToolError::argument_slot(index, "parameters object")),
        }
    }

    /// The parameters object at `index`, decoded into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ArgumentSlot`] for a wrong slot and
    /// [`ToolError::InvalidArguments`] if the object does not fit `T`.
    pub fn parameters<T: DeserializeOwned>(&self, index: usize) -> ToolResult<T> {
        decode_parameters(self.raw_parameters(index)?.clone())
    }
}

type TargetFn<P> = dyn Fn(Arc<P>, ToolArguments) -> ToolFuture + Send + Sync;

/// The unbound callable behind a tool: takes the provider instance and the
/// positional argument list.
pub struct ToolTarget<P> {
    call: Arc<TargetFn<P>>,
}

impl<P> ToolTarget<P> {
    /// Wrap an asynchronous callable.
    pub fn new<F, Fut>(call: F) -> Self
    where
        P: 'static,
        F: Fn(Arc<P>, ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult<Value>> + Send + 'static,
    {
        use futures::FutureExt;
        Self {
            call: Arc::new(move |provider, arguments| call(provider, arguments).boxed()),
        }
    }

    /// Invoke the target on `provider`.
    #[must_use]
    pub fn invoke(&self, provider: Arc<P>, arguments: ToolArguments) -> ToolFuture {
        (self.call)(provider, arguments)
    }
}

impl<P> Clone for ToolTarget<P> {
    fn clone(&self) -> Self {
        Self {
            call: Arc::clone(&self.call),
        }
    }
}

impl<P> fmt::Debug for ToolTarget<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolTarget").finish_non_exhaustive()
    }
}
