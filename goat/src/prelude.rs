//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use goat::prelude::*;
//! ```

#[cfg(feature = "derive")]
pub use goat_derive::tools;

pub use crate::collector::{
    Diagnostic, ToolCollection, ToolCollector, ToolSource, collect_provider_tools, collect_tools,
};
pub use crate::config::CollectorConfig;
pub use crate::error::{ConfigError, Error, Result, ToolError};
pub use crate::plugin::{Plugin, ProviderPlugin, SharedPlugin};
pub use crate::registry::{
    MethodSignature, ToolArguments, ToolMetadataRegistry, ToolOptions, ToolProvider, ToolTarget,
    registry_for,
};
pub use crate::schema::{ParameterSchema, ToolParameters};
pub use crate::tool::{
    Tool, ToolConfig, ToolDefinition, ToolResult, ToolSet, create_sync_tool, create_tool,
};
pub use crate::wallet::{
    Balance, Chain, MockWalletClient, SharedWalletClient, Signature, WalletClient, WalletError,
};

pub use async_trait::async_trait;
pub use schemars::JsonSchema;
pub use serde::{Deserialize, Serialize};
pub use serde_json::{Value, json};
