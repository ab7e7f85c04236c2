//! Collector configuration.
//!
//! [`CollectorConfig`] can be built in code or deserialized from a config
//! file; missing keys fall back to their defaults.
//!
//! ```rust,ignore
//! use goat::CollectorConfig;
//!
//! let config: CollectorConfig = serde_json::from_str(r#"{"strict_definitions": true}"#)?;
//! assert!(config.core_tools);
//! ```

use serde::{Deserialize, Serialize};

/// Options applied by [`ToolCollector`](crate::ToolCollector) to every
/// collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Prepend the core wallet tools (`get_address`, `get_chain`,
    /// `get_balance`).
    pub core_tools: bool,
    /// Emit tool definitions in strict mode.
    pub strict_definitions: bool,
    /// Append parameter docs to every tool description.
    pub describe_parameters: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            core_tools: true,
            strict_definitions: false,
            describe_parameters: false,
        }
    }
}

impl CollectorConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Include or leave out the core wallet tools.
    #[must_use]
    pub const fn core_tools(mut self, enabled: bool) -> Self {
        self.core_tools = enabled;
        self
    }

    /// Emit strict definitions.
    #[must_use]
    pub const fn strict_definitions(mut self, enabled: bool) -> Self {
        self.strict_definitions = enabled;
        self
    }

    /// Append parameter docs to descriptions.
    #[must_use]
    pub const fn describe_parameters(mut self, enabled: bool) -> Self {
        self.describe_parameters = enabled;
        self
    }
}
