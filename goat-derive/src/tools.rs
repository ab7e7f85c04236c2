//! `#[tools]` macro implementation.
//!
//! Reads the `#[tool]` methods of an inherent impl, classifies each declared
//! argument as the parameters slot or the wallet-client slot, and emits a
//! `ToolProvider` impl whose `describe_tools` makes the matching registration
//! calls. Signature mistakes become compile errors here instead of
//! `ConfigError`s at runtime.

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, Expr, ExprLit, FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, Lit, Meta,
    PathArguments, Type, TypeParamBound, parse_macro_input, spanned::Spanned,
};

/// Parsed arguments of a `#[tool]` attribute.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct ToolArgs {
    /// Tool description (overrides doc comment)
    description: Option<String>,
    /// Tool name (overrides the snake_case method name)
    name: Option<String>,
}

impl ToolArgs {
    fn from_attr(attr: &Attribute) -> darling::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::List(list) => {
                let items = NestedMeta::parse_meta_list(list.tokens.clone())?;
                Self::from_list(&items)
            }
            Meta::NameValue(nv) => Err(darling::Error::custom(
                "expected #[tool] or #[tool(description = \"...\", name = \"...\")]",
            )
            .with_span(nv)),
        }
    }
}

/// Description taken from doc comments: every line before the first
/// `# Section` header, joined with spaces.
fn doc_description(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("doc")) {
        let Meta::NameValue(meta) = &attr.meta else {
            continue;
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &meta.value
        else {
            continue;
        };
        let value = s.value();
        let trimmed = value.trim();
        if trimmed.starts_with("# ") {
            break;
        }
        if !trimmed.is_empty() {
            lines.push(trimmed.to_owned());
        }
    }
    lines.join(" ")
}

/// How one declared argument is filled.
enum Slot {
    /// `&dyn WalletClient`
    WalletRef,
    /// `SharedWalletClient` / `Arc<dyn WalletClient>`
    WalletShared,
    /// The parameters object.
    Parameters(Type),
}

impl Slot {
    fn classify(ty: &Type) -> syn::Result<Self> {
        match ty {
            Type::Reference(reference) => {
                if is_wallet_trait_object(&reference.elem) {
                    if reference.mutability.is_some() {
                        return Err(syn::Error::new_spanned(
                            ty,
                            "the wallet client is shared; take `&dyn WalletClient`",
                        ));
                    }
                    Ok(Self::WalletRef)
                } else {
                    Err(syn::Error::new_spanned(
                        ty,
                        "tool arguments must be a wallet client or an owned parameters type",
                    ))
                }
            }
            Type::Path(path) => {
                let Some(segment) = path.path.segments.last() else {
                    return Ok(Self::Parameters(ty.clone()));
                };
                if segment.ident == "SharedWalletClient" {
                    return Ok(Self::WalletShared);
                }
                if segment.ident == "Arc"
                    && let PathArguments::AngleBracketed(args) = &segment.arguments
                    && let Some(GenericArgument::Type(inner)) = args.args.first()
                    && is_wallet_trait_object(inner)
                {
                    return Ok(Self::WalletShared);
                }
                Ok(Self::Parameters(ty.clone()))
            }
            _ => Ok(Self::Parameters(ty.clone())),
        }
    }

    const fn is_wallet(&self) -> bool {
        matches!(self, Self::WalletRef | Self::WalletShared)
    }
}

fn is_wallet_trait_object(ty: &Type) -> bool {
    let bounds = match ty {
        Type::TraitObject(object) => &object.bounds,
        Type::Paren(paren) => return is_wallet_trait_object(&paren.elem),
        _ => return false,
    };
    bounds.iter().any(|bound| {
        matches!(bound, TypeParamBound::Trait(t)
            if t.path.segments.last().is_some_and(|s| s.ident == "WalletClient"))
    })
}

/// One `#[tool]` method, validated.
struct ToolMethod {
    method: syn::Ident,
    description: String,
    name: Option<String>,
    slots: Vec<Slot>,
    is_async: bool,
}

impl ToolMethod {
    fn parse(item: &ImplItemFn, args: ToolArgs) -> syn::Result<Self> {
        let sig = &item.sig;
        let method = sig.ident.clone();

        match sig.receiver() {
            Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
            Some(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "tool methods must take `&self`",
                ));
            }
            None => {
                return Err(syn::Error::new_spanned(
                    &sig.ident,
                    "tool methods must take `&self`",
                ));
            }
        }

        let declared: Vec<&Type> = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(pat_type) => Some(&*pat_type.ty),
                FnArg::Receiver(_) => None,
            })
            .collect();

        match declared.len() {
            0 => {
                return Err(syn::Error::new_spanned(
                    &sig.ident,
                    format!(
                        "method '{method}' has no parameters. Tool methods must have a \
                         parameters argument and optionally a wallet client argument"
                    ),
                ));
            }
            1 | 2 => {}
            count => {
                return Err(syn::Error::new_spanned(
                    &sig.inputs,
                    format!(
                        "method '{method}' has {count} parameters. Tool methods must have a \
                         parameters argument and optionally a wallet client argument"
                    ),
                ));
            }
        }

        let slots = declared
            .iter()
            .map(|ty| Slot::classify(ty))
            .collect::<syn::Result<Vec<_>>>()?;

        let parameters = slots.iter().filter(|s| !s.is_wallet()).count();
        let wallets = slots.iter().filter(|s| s.is_wallet()).count();
        if wallets > 1 {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                format!("method '{method}' declares more than one wallet client argument"),
            ));
        }
        if parameters == 0 {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                format!("method '{method}' has no parameters slot"),
            ));
        }
        if parameters > 1 {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                format!("method '{method}' declares more than one parameters argument"),
            ));
        }

        let description = args
            .description
            .unwrap_or_else(|| doc_description(&item.attrs));
        if description.trim().is_empty() {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                format!(
                    "tool '{method}' needs a description: add a doc comment or \
                     #[tool(description = \"...\")]"
                ),
            ));
        }

        Ok(Self {
            method,
            description,
            name: args.name,
            slots,
            is_async: sig.asyncness.is_some(),
        })
    }

    fn registration(&self) -> TokenStream2 {
        let method = &self.method;
        let method_str = method.to_string();
        let description = &self.description;

        let options = match &self.name {
            Some(name) => quote! {
                ::goat::registry::ToolOptions::new(#description).with_name(#name)
            },
            None => quote! { ::goat::registry::ToolOptions::new(#description) },
        };

        let mut signature = Vec::new();
        let mut extract = Vec::new();
        let mut call_args = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let arg = format_ident!("__goat_arg{}", index);
            match slot {
                Slot::WalletRef | Slot::WalletShared => {
                    signature.push(quote! { .wallet_client() });
                    extract.push(quote! {
                        let #arg = arguments.wallet_client(#index)?;
                    });
                    if matches!(slot, Slot::WalletRef) {
                        call_args.push(quote! { &*#arg });
                    } else {
                        call_args.push(quote! { #arg });
                    }
                }
                Slot::Parameters(ty) => {
                    signature.push(quote! { .parameters::<#ty>() });
                    extract.push(quote! {
                        let #arg = arguments.parameters::<#ty>(#index)?;
                    });
                    call_args.push(quote! { #arg });
                }
            }
        }

        let await_call = if self.is_async {
            quote! { .await }
        } else {
            quote! {}
        };
        quote! {
            registry.register(
                #options,
                ::goat::registry::MethodSignature::new(#method_str) #(#signature)*,
                ::goat::registry::ToolTarget::new(
                    |provider: ::std::sync::Arc<Self>,
                     arguments: ::goat::registry::ToolArguments| async move {
                        #(#extract)*
                        let output = provider.#method(#(#call_args),*) #await_call;
                        // `Result` outputs resolve to `FallibleOutput` whatever
                        // alias spells them; everything else serializes as is.
                        {
                            use ::goat::tool::{FallibleOutput as _, PlainOutput as _};
                            (&::goat::tool::ToolOutput::new(output)).into_tool_output()
                        }
                    },
                ),
            )?;
        }
    }
}

/// Main implementation of the tools macro.
pub fn tools_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(
            TokenStream2::from(args).span(),
            "#[tools] takes no arguments; configure each method with #[tool(...)]",
        )
        .to_compile_error()
        .into();
    }
    let mut item_impl = parse_macro_input!(input as ItemImpl);

    match expand(&mut item_impl) {
        Ok(provider_impl) => TokenStream::from(quote! {
            #item_impl
            #provider_impl
        }),
        Err(err) => {
            let err = err.to_compile_error();
            TokenStream::from(quote! {
                #item_impl
                #err
            })
        }
    }
}

fn expand(item_impl: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[tools] goes on an inherent impl, not a trait impl",
        ));
    }

    let mut errors: Option<syn::Error> = None;
    let mut methods = Vec::new();

    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let mut tool_attrs = Vec::new();
        method.attrs.retain(|attr| {
            if attr.path().is_ident("tool") {
                tool_attrs.push(attr.clone());
                false
            } else {
                true
            }
        });

        let parsed = match tool_attrs.as_slice() {
            [] => continue,
            [attr] => ToolArgs::from_attr(attr)
                .map_err(|e| syn::Error::new(attr.span(), e.to_string()))
                .and_then(|args| ToolMethod::parse(&*method, args)),
            [_, extra, ..] => Err(syn::Error::new_spanned(
                extra,
                "a method takes at most one #[tool] attribute",
            )),
        };

        match parsed {
            Ok(tool) => methods.push(tool),
            Err(err) => match &mut errors {
                Some(existing) => existing.combine(err),
                None => errors = Some(err),
            },
        }
    }

    if let Some(err) = errors {
        return Err(err);
    }

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();
    let registrations = methods.iter().map(ToolMethod::registration);

    Ok(quote! {
        impl #impl_generics ::goat::registry::ToolProvider for #self_ty #where_clause {
            #[allow(unused_variables)]
            fn describe_tools(
                registry: &mut ::goat::registry::ToolMetadataRegistry<Self>,
            ) -> ::std::result::Result<(), ::goat::ConfigError> {
                #(#registrations)*
                ::std::result::Result::Ok(())
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_errors(mut item_impl: ItemImpl) -> Vec<String> {
        expand(&mut item_impl)
            .unwrap_err()
            .into_iter()
            .map(|err| err.to_string())
            .collect()
    }

    fn expand_error(item_impl: ItemImpl) -> String {
        let errors = expand_errors(item_impl);
        assert_eq!(errors.len(), 1, "{errors:?}");
        errors.into_iter().next().unwrap()
    }

    fn compact(tokens: &TokenStream2) -> String {
        tokens.to_string().chars().filter(|c| !c.is_whitespace()).collect()
    }

    mod accepted {
        use super::*;

        #[test]
        fn wallet_then_parameters() {
            let mut item_impl: ItemImpl = parse_quote! {
                impl WalletOpsService {
                    /// Get the native balance of an address.
                    ///
                    /// # Notes
                    ///
                    /// Not part of the description.
                    #[tool]
                    async fn get_balance(
                        &self,
                        wallet: &dyn WalletClient,
                        params: BalanceParams,
                    ) -> Result<Balance, WalletError> {
                        wallet.balance_of(&params.address).await
                    }
                }
            };
            let generated = compact(&expand(&mut item_impl).unwrap());

            assert!(generated.contains("impl::goat::registry::ToolProviderforWalletOpsService"));
            assert!(generated.contains(
                "MethodSignature::new(\"get_balance\").wallet_client().parameters::<BalanceParams>()"
            ));
            assert!(generated.contains("ToolOptions::new(\"Getthenativebalanceofanaddress.\")"));
            assert!(generated.contains("arguments.wallet_client(0usize)?"));
            assert!(generated.contains("arguments.parameters::<BalanceParams>(1usize)?"));
            assert!(generated.contains(".await;"));
            assert!(generated.contains("ToolOutput::new(output)"));
        }

        #[test]
        fn tool_attribute_is_stripped() {
            let mut item_impl: ItemImpl = parse_quote! {
                impl Echo {
                    #[tool(description = "Echo text back", name = "say")]
                    fn echo(&self, params: EchoParams) -> String {
                        params.text
                    }

                    fn helper(&self) {}
                }
            };
            let generated = compact(&expand(&mut item_impl).unwrap());

            assert!(generated.contains("ToolOptions::new(\"Echotextback\").with_name(\"say\")"));
            assert!(!generated.contains("helper"));
            assert!(!generated.contains(".await"));
            assert!(item_impl.items.iter().all(|item| {
                !matches!(item, ImplItem::Fn(method)
                    if method.attrs.iter().any(|attr| attr.path().is_ident("tool")))
            }));
        }

        #[test]
        fn shared_wallet_after_parameters() {
            let mut item_impl: ItemImpl = parse_quote! {
                impl Signer {
                    /// Sign a message.
                    #[tool]
                    async fn sign(&self, params: SignParams, wallet: Arc<dyn WalletClient>) -> String {
                        String::new()
                    }
                }
            };
            let generated = compact(&expand(&mut item_impl).unwrap());
            assert!(generated.contains(".parameters::<SignParams>().wallet_client()"));
            assert!(generated.contains("provider.sign(__goat_arg0,__goat_arg1)"));
        }

        #[test]
        fn impl_without_tools_registers_nothing() {
            let mut item_impl: ItemImpl = parse_quote! {
                impl Plain {
                    fn helper(&self) -> u8 { 1 }
                }
            };
            let generated = compact(&expand(&mut item_impl).unwrap());
            assert!(!generated.contains("registry.register"));
            assert!(generated.contains("::std::result::Result::Ok(())"));
        }
    }

    mod rejected {
        use super::*;

        #[test]
        fn no_arguments() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Nothing to bind.
                    #[tool]
                    fn ping(&self) -> String { String::new() }
                }
            });
            assert!(message.starts_with("method 'ping' has no parameters."));
        }

        #[test]
        fn three_arguments() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Too many.
                    #[tool]
                    fn swap(&self, wallet: &dyn WalletClient, a: SwapParams, b: SwapParams) -> String {
                        String::new()
                    }
                }
            });
            assert!(message.starts_with("method 'swap' has 3 parameters."));
        }

        #[test]
        fn wallet_without_parameters() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Wallet only.
                    #[tool]
                    fn address(&self, wallet: &dyn WalletClient) -> String {
                        String::new()
                    }
                }
            });
            assert_eq!(message, "method 'address' has no parameters slot");
        }

        #[test]
        fn two_parameters_arguments() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Two objects.
                    #[tool]
                    fn merge(&self, a: MergeParams, b: MergeParams) -> String {
                        String::new()
                    }
                }
            });
            assert_eq!(message, "method 'merge' declares more than one parameters argument");
        }

        #[test]
        fn two_wallet_arguments() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Two wallets.
                    #[tool]
                    fn bridge(&self, from: &dyn WalletClient, to: SharedWalletClient) -> String {
                        String::new()
                    }
                }
            });
            assert_eq!(
                message,
                "method 'bridge' declares more than one wallet client argument"
            );
        }

        #[test]
        fn mutable_wallet_reference() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Mutable wallet.
                    #[tool]
                    fn sign(&self, wallet: &mut dyn WalletClient, params: SignParams) -> String {
                        String::new()
                    }
                }
            });
            assert_eq!(message, "the wallet client is shared; take `&dyn WalletClient`");
        }

        #[test]
        fn borrowed_parameters() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Borrowed params.
                    #[tool]
                    fn echo(&self, params: &EchoParams) -> String {
                        String::new()
                    }
                }
            });
            assert_eq!(
                message,
                "tool arguments must be a wallet client or an owned parameters type"
            );
        }

        #[test]
        fn receivers_other_than_shared_ref() {
            let cases: [ItemImpl; 3] = [
                parse_quote! {
                    impl Svc {
                        /// By value.
                        #[tool]
                        fn echo(self, params: EchoParams) -> String { String::new() }
                    }
                },
                parse_quote! {
                    impl Svc {
                        /// Mutable.
                        #[tool]
                        fn echo(&mut self, params: EchoParams) -> String { String::new() }
                    }
                },
                parse_quote! {
                    impl Svc {
                        /// Associated function.
                        #[tool]
                        fn echo(params: EchoParams) -> String { String::new() }
                    }
                },
            ];
            for item_impl in cases {
                assert_eq!(expand_error(item_impl), "tool methods must take `&self`");
            }
        }

        #[test]
        fn missing_description() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    #[tool]
                    fn echo(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert!(message.starts_with("tool 'echo' needs a description"));
        }

        #[test]
        fn doc_comment_with_only_a_section_header() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// # Errors
                    ///
                    /// Never.
                    #[tool]
                    fn echo(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert!(message.starts_with("tool 'echo' needs a description"));
        }

        #[test]
        fn trait_impl() {
            let message = expand_error(parse_quote! {
                impl Display for Svc {
                    /// Formats.
                    #[tool]
                    fn fmt(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert_eq!(message, "#[tools] goes on an inherent impl, not a trait impl");
        }

        #[test]
        fn repeated_tool_attribute() {
            let message = expand_error(parse_quote! {
                impl Svc {
                    /// Twice.
                    #[tool]
                    #[tool(name = "again")]
                    fn echo(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert_eq!(message, "a method takes at most one #[tool] attribute");
        }

        #[test]
        fn unknown_tool_option() {
            let errors = expand_errors(parse_quote! {
                impl Svc {
                    /// Unknown option.
                    #[tool(title = "Echo")]
                    fn echo(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("title"));
        }

        #[test]
        fn every_bad_method_is_reported() {
            let errors = expand_errors(parse_quote! {
                impl Svc {
                    /// No arguments.
                    #[tool]
                    fn ping(&self) -> String { String::new() }

                    /// Fine.
                    #[tool]
                    fn echo(&self, params: EchoParams) -> String { String::new() }

                    #[tool]
                    fn quiet(&self, params: EchoParams) -> String { String::new() }
                }
            });
            assert_eq!(errors.len(), 2);
            assert!(errors[0].starts_with("method 'ping'"));
            assert!(errors[1].starts_with("tool 'quiet'"));
        }
    }
}
