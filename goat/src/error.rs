//! Unified error types for the goat tool core.
//!
//! This module provides the error hierarchy covering:
//! - Tool registration mistakes made by plugin authors ([`ConfigError`])
//! - Tool execution errors ([`ToolError`])
//! - Wallet client errors ([`WalletError`])

use crate::wallet::WalletError;

/// Result type alias for goat operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The main error type for the goat tool core.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A provider declared its tools incorrectly.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tool execution error.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Wallet client error.
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// A plugin failed to build its tool list.
    #[error("Plugin '{plugin}' failed to build its tools: {message}")]
    Plugin {
        /// Name of the failing plugin.
        plugin: String,
        /// What went wrong.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a plugin error.
    #[must_use]
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

/// A tool declaration that can never be invoked correctly.
///
/// Raised while a provider type populates its registry, before any tool built
/// from it is handed to an agent. These indicate a programming mistake in a
/// plugin and halt plugin loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The method declares no parameters at all.
    #[error(
        "Method '{method}' on '{provider}' has no parameters. Tool methods must have a \
         parameters argument and optionally a wallet client argument"
    )]
    NoParameters {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
    },

    /// The method declares more than two parameters.
    #[error(
        "Method '{method}' on '{provider}' has {count} parameters. Tool methods must have a \
         parameters argument and optionally a wallet client argument"
    )]
    TooManyParameters {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
        /// Number of declared parameters.
        count: usize,
    },

    /// None of the declared parameters carries a parameter schema.
    #[error("Method '{method}' on '{provider}' has no parameters slot")]
    MissingParametersSlot {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
    },

    /// The same slot kind was declared twice.
    #[error("Method '{method}' on '{provider}' declares more than one {slot} argument")]
    DuplicateSlot {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
        /// The duplicated slot kind ("parameters" or "wallet client").
        slot: &'static str,
    },

    /// A declared parameter is neither a parameter schema nor a wallet client.
    #[error(
        "Method '{method}' on '{provider}': argument {index} of type '{type_name}' is neither \
         a parameters schema nor a wallet client"
    )]
    UnrecognizedParameter {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
        /// Argument position.
        index: usize,
        /// Declared type of the argument.
        type_name: String,
    },

    /// The tool description is empty.
    #[error("Method '{method}' on '{provider}' has an empty tool description")]
    EmptyDescription {
        /// Provider type name.
        provider: String,
        /// Method name.
        method: String,
    },
}

impl ConfigError {
    /// Name of the method the error was raised for.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::NoParameters { method, .. }
            | Self::TooManyParameters { method, .. }
            | Self::MissingParametersSlot { method, .. }
            | Self::DuplicateSlot { method, .. }
            | Self::UnrecognizedParameter { method, .. }
            | Self::EmptyDescription { method, .. } => method,
        }
    }
}

/// Error type for tool execution failures.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Invalid arguments provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A bound argument slot was empty or held the wrong kind of value.
    #[error("Argument slot {index} does not hold a {expected}")]
    ArgumentSlot {
        /// Slot position.
        index: usize,
        /// What the target expected at that position.
        expected: &'static str,
    },

    /// Generic error.
    #[error("Tool error: {0}")]
    Other(String),
}

impl ToolError {
    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create an argument slot error.
    #[must_use]
    pub const fn argument_slot(index: usize, expected: &'static str) -> Self {
        Self::ArgumentSlot { index, expected }
    }
}

impl From<String> for ToolError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ToolError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_owned())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

impl From<Error> for ToolError {
    fn from(err: Error) -> Self {
        match err {
            Error::Tool(inner) => inner,
            other => Self::Execution(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod error {
        use super::*;

        #[test]
        fn plugin_creates_error() {
            let err = Error::plugin("erc20", "rpc unreachable");
            assert!(matches!(err, Error::Plugin { .. }));
            assert!(err.to_string().contains("erc20"));
            assert!(err.to_string().contains("rpc unreachable"));
        }

        #[test]
        fn from_config_error() {
            let err: Error = ConfigError::MissingParametersSlot {
                provider: "Svc".into(),
                method: "run".into(),
            }
            .into();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn from_tool_error() {
            let err: Error = ToolError::not_found("my_tool").into();
            assert!(matches!(err, Error::Tool(_)));
        }

        #[test]
        fn from_wallet_error() {
            let err: Error = WalletError::signing("no key").into();
            assert!(matches!(err, Error::Wallet(_)));
        }

        #[test]
        fn from_json_error() {
            let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    mod config_error {
        use super::*;

        #[test]
        fn no_parameters_names_method_and_provider() {
            let err = ConfigError::NoParameters {
                provider: "WalletOpsService".into(),
                method: "getBalance".into(),
            };
            let msg = err.to_string();
            assert!(msg.contains("getBalance"));
            assert!(msg.contains("WalletOpsService"));
            assert!(msg.contains("no parameters"));
        }

        #[test]
        fn too_many_parameters_reports_count() {
            let err = ConfigError::TooManyParameters {
                provider: "Svc".into(),
                method: "swap".into(),
                count: 3,
            };
            assert!(err.to_string().contains("has 3 parameters"));
        }

        #[test]
        fn missing_slot_message() {
            let err = ConfigError::MissingParametersSlot {
                provider: "Svc".into(),
                method: "swap".into(),
            };
            assert!(err.to_string().contains("no parameters slot"));
        }

        #[test]
        fn method_accessor_covers_all_variants() {
            let errors = [
                ConfigError::NoParameters {
                    provider: "P".into(),
                    method: "a".into(),
                },
                ConfigError::TooManyParameters {
                    provider: "P".into(),
                    method: "a".into(),
                    count: 4,
                },
                ConfigError::MissingParametersSlot {
                    provider: "P".into(),
                    method: "a".into(),
                },
                ConfigError::DuplicateSlot {
                    provider: "P".into(),
                    method: "a".into(),
                    slot: "wallet client",
                },
                ConfigError::UnrecognizedParameter {
                    provider: "P".into(),
                    method: "a".into(),
                    index: 1,
                    type_name: "u32".into(),
                },
                ConfigError::EmptyDescription {
                    provider: "P".into(),
                    method: "a".into(),
                },
            ];
            for err in errors {
                assert_eq!(err.method(), "a");
            }
        }
    }

    mod tool_error {
        use super::*;

        #[test]
        fn execution_creates_error() {
            let err = ToolError::execution("failed to run");
            assert!(matches!(err, ToolError::Execution(_)));
            assert!(err.to_string().contains("failed to run"));
        }

        #[test]
        fn invalid_args_creates_error() {
            let err = ToolError::invalid_args("missing field 'address'");
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }

        #[test]
        fn argument_slot_message() {
            let err = ToolError::argument_slot(1, "wallet client");
            assert_eq!(err.to_string(), "Argument slot 1 does not hold a wallet client");
        }

        #[test]
        fn from_str_and_string() {
            let a: ToolError = "custom".into();
            let b: ToolError = String::from("custom").into();
            assert!(matches!(a, ToolError::Other(_)));
            assert!(matches!(b, ToolError::Other(_)));
        }

        #[test]
        fn from_serde_json_error() {
            let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
            let err: ToolError = json_err.into();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }

        #[test]
        fn from_crate_error_unwraps_tool_variant() {
            let err: ToolError = Error::Tool(ToolError::not_found("x")).into();
            assert!(matches!(err, ToolError::NotFound(_)));

            let err: ToolError = Error::plugin("p", "boom").into();
            assert!(matches!(err, ToolError::Execution(_)));
        }
    }
}
