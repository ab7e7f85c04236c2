//! Tool options and declared method signatures.
//!
//! A [`MethodSignature`] lists the parameters a tool method declares, in
//! order. Resolving it locates the parameters slot and the optional
//! wallet-client slot, or reports why the method can never be called as a
//! tool.

use convert_case::{Case, Casing};

use crate::error::ConfigError;
use crate::schema::{ParameterSchema, ToolParameters};

/// Options attached to a tool method: an optional explicit name and the
/// description shown to the LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOptions {
    name: Option<String>,
    description: String,
}

impl ToolOptions {
    /// Options with the given description and a name derived from the method.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: description.into(),
        }
    }

    /// Override the tool name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The explicit name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The tool name for `method`: the explicit name, or the snake_case form
    /// of the method name (`getTokenBalance` becomes `get_token_balance`).
    #[must_use]
    pub fn resolve_name(&self, method: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| method.to_case(Case::Snake))
    }
}

/// One declared parameter of a tool method.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeclaredParam {
    /// Receives the validated parameters object.
    Parameters(ParameterSchema),
    /// Receives the runtime wallet client.
    WalletClient,
    /// Anything else; carries the declared type name for error reporting.
    Other(String),
}

/// The ordered parameter list of a tool method.
///
/// # Example
///
/// ```rust,ignore
/// let signature = MethodSignature::new("getBalance")
///     .wallet_client()
///     .parameters::<BalanceParams>();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    method: String,
    params: Vec<DeclaredParam>,
}

impl MethodSignature {
    /// An empty signature for `method`.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
        }
    }

    /// Declare a parameters argument of type `T`.
    #[must_use]
    pub fn parameters<T: ToolParameters>(self) -> Self {
        self.parameters_schema(ParameterSchema::of::<T>())
    }

    /// Declare a parameters argument described by `schema`.
    #[must_use]
    pub fn parameters_schema(self, schema: ParameterSchema) -> Self {
        self.param(DeclaredParam::Parameters(schema))
    }

    /// Declare a wallet client argument.
    #[must_use]
    pub fn wallet_client(self) -> Self {
        self.param(DeclaredParam::WalletClient)
    }

    /// Declare an argument of some other type.
    #[must_use]
    pub fn other(self, type_name: impl Into<String>) -> Self {
        self.param(DeclaredParam::Other(type_name.into()))
    }

    /// Append a declared parameter.
    #[must_use]
    pub fn param(mut self, param: DeclaredParam) -> Self {
        self.params.push(param);
        self
    }

    /// Method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Declared parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[DeclaredParam] {
        &self.params
    }

    /// Locate the parameters slot and the optional wallet-client slot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the method has no parameters, more than
    /// two, no parameters slot, a slot kind declared twice, or an argument
    /// that is neither kind.
    pub fn resolve(&self, provider: &str) -> Result<ResolvedSlots, ConfigError> {
        let provider = provider.to_owned();
        let method = self.method.clone();

        match self.params.len() {
            0 => return Err(ConfigError::NoParameters { provider, method }),
            1 | 2 => {}
            count => {
                return Err(ConfigError::TooManyParameters {
                    provider,
                    method,
                    count,
                });
            }
        }

        let mut parameters = None;
        let mut wallet_client = None;
        let mut unrecognized = None;

        for (index, param) in self.params.iter().enumerate() {
            match param {
                DeclaredParam::Parameters(schema) => {
                    if parameters.is_some() {
                        return Err(ConfigError::DuplicateSlot {
                            provider,
                            method,
                            slot: "parameters",
                        });
                    }
                    parameters = Some(ParametersSlot {
                        index,
                        schema: schema.clone(),
                    });
                }
                DeclaredParam::WalletClient => {
                    if wallet_client.is_some() {
                        return Err(ConfigError::DuplicateSlot {
                            provider,
                            method,
                            slot: "wallet client",
                        });
                    }
                    wallet_client = Some(WalletClientSlot { index });
                }
                DeclaredParam::Other(type_name) => {
                    unrecognized.get_or_insert((index, type_name.clone()));
                }
            }
        }

        let Some(parameters) = parameters else {
            return Err(ConfigError::MissingParametersSlot { provider, method });
        };
        if let Some((index, type_name)) = unrecognized {
            return Err(ConfigError::UnrecognizedParameter {
                provider,
                method,
                index,
                type_name,
            });
        }

        Ok(ResolvedSlots {
            arity: self.params.len(),
            parameters,
            wallet_client,
        })
    }
}

/// Position and schema of the argument receiving validated input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersSlot {
    /// Argument position.
    pub index: usize,
    /// Schema the input is validated against.
    pub schema: ParameterSchema,
}

/// Position of the argument receiving the wallet client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletClientSlot {
    /// Argument position.
    pub index: usize,
}

/// Result of resolving a [`MethodSignature`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlots {
    /// Number of declared arguments.
    pub arity: usize,
    /// The parameters slot.
    pub parameters: ParametersSlot,
    /// The wallet-client slot, if declared.
    pub wallet_client: Option<WalletClientSlot>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct QuoteParams {
        /// Token to quote.
        token: String,
    }

    mod options {
        use super::*;

        #[test]
        fn derives_snake_case_name() {
            let options = ToolOptions::new("Get a token balance");
            assert_eq!(options.resolve_name("getTokenBalance"), "get_token_balance");
            assert_eq!(options.resolve_name("get_quote"), "get_quote");
        }

        #[test]
        fn explicit_name_wins() {
            let options = ToolOptions::new("Quote").with_name("quote_v2");
            assert_eq!(options.resolve_name("getQuote"), "quote_v2");
            assert_eq!(options.name(), Some("quote_v2"));
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn parameters_only() {
            let slots = MethodSignature::new("getQuote")
                .parameters::<QuoteParams>()
                .resolve("Svc")
                .unwrap();
            assert_eq!(slots.arity, 1);
            assert_eq!(slots.parameters.index, 0);
            assert_eq!(slots.parameters.schema.name(), "QuoteParams");
            assert!(slots.wallet_client.is_none());
        }

        #[test]
        fn wallet_first() {
            let slots = MethodSignature::new("getBalance")
                .wallet_client()
                .parameters::<QuoteParams>()
                .resolve("Svc")
                .unwrap();
            assert_eq!(slots.arity, 2);
            assert_eq!(slots.wallet_client, Some(WalletClientSlot { index: 0 }));
            assert_eq!(slots.parameters.index, 1);
        }

        #[test]
        fn parameters_first() {
            let slots = MethodSignature::new("getBalance")
                .parameters::<QuoteParams>()
                .wallet_client()
                .resolve("Svc")
                .unwrap();
            assert_eq!(slots.parameters.index, 0);
            assert_eq!(slots.wallet_client, Some(WalletClientSlot { index: 1 }));
        }

        #[test]
        fn zero_parameters() {
            let err = MethodSignature::new("ping").resolve("Svc").unwrap_err();
            assert!(matches!(err, ConfigError::NoParameters { .. }));
        }

        #[test]
        fn three_parameters() {
            let err = MethodSignature::new("swap")
                .wallet_client()
                .parameters::<QuoteParams>()
                .other("u64")
                .resolve("Svc")
                .unwrap_err();
            assert!(matches!(err, ConfigError::TooManyParameters { count: 3, .. }));
        }

        #[test]
        fn wallet_only_has_no_parameters_slot() {
            let err = MethodSignature::new("getBalance")
                .wallet_client()
                .resolve("Svc")
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingParametersSlot { .. }));
        }

        #[test]
        fn unknown_only_has_no_parameters_slot() {
            let err = MethodSignature::new("getBalance")
                .other("String")
                .resolve("Svc")
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingParametersSlot { .. }));
        }

        #[test]
        fn unknown_beside_parameters() {
            let err = MethodSignature::new("getBalance")
                .other("u32")
                .parameters::<QuoteParams>()
                .resolve("Svc")
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::UnrecognizedParameter {
                    provider: "Svc".into(),
                    method: "getBalance".into(),
                    index: 0,
                    type_name: "u32".into(),
                }
            );
        }

        #[test]
        fn duplicate_parameters_slot() {
            let err = MethodSignature::new("m")
                .parameters::<QuoteParams>()
                .parameters::<QuoteParams>()
                .resolve("Svc")
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::DuplicateSlot {
                    slot: "parameters",
                    ..
                }
            ));
        }

        #[test]
        fn duplicate_wallet_slot() {
            let err = MethodSignature::new("m")
                .wallet_client()
                .wallet_client()
                .resolve("Svc")
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::DuplicateSlot {
                    slot: "wallet client",
                    ..
                }
            ));
        }
    }
}
