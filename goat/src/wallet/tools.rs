//! Core tools derived from the wallet client.
//!
//! The collector adds these ahead of any plugin tools, so every agent can ask
//! for its own address, chain and balance.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::SharedWalletClient;
use crate::schema::{ParameterSchema, decode_parameters};
use crate::tool::{Tool, ToolConfig, ToolResult, create_tool, to_output_value};

/// Build the core tools bound to `wallet`.
///
/// Returns `get_address`, `get_chain` and `get_balance`, in that order.
#[must_use]
pub fn core_tools(wallet: &SharedWalletClient) -> Vec<Tool> {
    vec![
        get_address(Arc::clone(wallet)),
        get_chain(Arc::clone(wallet)),
        get_balance(Arc::clone(wallet)),
    ]
}

// ============================================================================
// get_address
// ============================================================================

fn get_address(wallet: SharedWalletClient) -> Tool {
    let schema = ParameterSchema::empty();
    let config = ToolConfig::new(
        "get_address",
        "Get the address of the wallet",
        schema.clone(),
    );
    create_tool(config, move |parameters| {
        let wallet = Arc::clone(&wallet);
        let schema = schema.clone();
        async move {
            schema.validate(&parameters)?;
            Ok(Value::String(wallet.address().to_owned()))
        }
    })
}

// ============================================================================
// get_chain
// ============================================================================

fn get_chain(wallet: SharedWalletClient) -> Tool {
    let schema = ParameterSchema::empty();
    let config = ToolConfig::new(
        "get_chain",
        "Get the chain the wallet is connected to",
        schema.clone(),
    );
    create_tool(config, move |parameters| {
        let wallet = Arc::clone(&wallet);
        let schema = schema.clone();
        async move {
            schema.validate(&parameters)?;
            let chain = wallet.chain();
            let mut out = to_output_value(chain)?;
            if let Some(object) = out.as_object_mut() {
                object.insert("name".to_owned(), Value::String(chain.name()));
            }
            Ok(out)
        }
    })
}

// ============================================================================
// get_balance
// ============================================================================

/// Parameters of the `get_balance` core tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct GetBalanceParameters {
    /// The address to get the balance of. Defaults to the wallet's own address.
    #[serde(default)]
    address: Option<String>,
}

fn get_balance(wallet: SharedWalletClient) -> Tool {
    let schema = ParameterSchema::of::<GetBalanceParameters>();
    let config = ToolConfig::new(
        "get_balance",
        "Get the native token balance of an address",
        schema.clone(),
    );
    create_tool(config, move |parameters| {
        let wallet = Arc::clone(&wallet);
        let schema = schema.clone();
        async move { balance(&wallet, &schema, parameters).await }
    })
}

async fn balance(
    wallet: &SharedWalletClient,
    schema: &ParameterSchema,
    parameters: Value,
) -> ToolResult<Value> {
    schema.validate(&parameters)?;
    let GetBalanceParameters { address } = decode_parameters(parameters)?;
    let address = address.unwrap_or_else(|| wallet.address().to_owned());
    let balance = wallet.balance_of(&address).await?;
    Ok(json!({
        "address": address,
        "balance": balance,
    }))
}
