//! Procedural macros for goat tool providers.
//!
//! This crate provides the `#[tools]` attribute macro, which turns the
//! `#[tool]`-marked methods of an inherent impl into registered tools.

extern crate proc_macro;

mod tools;

use proc_macro::TokenStream;

/// Implements `goat::registry::ToolProvider` for the type of an inherent impl.
///
/// Every method marked `#[tool]` is registered as a tool. A tool method takes
/// `&self`, one parameters argument (any `Deserialize + JsonSchema` type) and
/// optionally one wallet client argument (`&dyn WalletClient` or
/// `SharedWalletClient`), in either order. It may be `async`, and may return
/// a plain serializable value or a `Result` whose error converts into
/// `ToolError`.
///
/// The description comes from `#[tool(description = "...")]` or, failing
/// that, from the method's doc comment. The name defaults to the snake_case
/// method name and can be overridden with `#[tool(name = "...")]`.
///
/// Methods that could never be called as tools are rejected at compile time.
///
/// # Examples
///
/// ```rust,ignore
/// use goat::prelude::*;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct BalanceParams {
///     /// The address to query.
///     address: String,
/// }
///
/// struct WalletOpsService;
///
/// #[tools]
/// impl WalletOpsService {
///     /// Get the native balance of an address.
///     #[tool]
///     async fn get_balance(
///         &self,
///         wallet: &dyn WalletClient,
///         params: BalanceParams,
///     ) -> Result<Balance, WalletError> {
///         wallet.balance_of(&params.address).await
///     }
///
///     #[tool(name = "echo_address", description = "Echo an address back")]
///     fn echo(&self, params: BalanceParams) -> String {
///         params.address
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn tools(args: TokenStream, input: TokenStream) -> TokenStream {
    tools::tools_impl(args, input)
}
