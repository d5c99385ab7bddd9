use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};

use syn::ext::IdentExt as _;
use syn::spanned::Spanned as _;
use syn::{
    Attribute, Data, DeriveInput, Error, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Pat,
    PathArguments, ReturnType, Type,
};

const CONFIGURE_ATTR: &str = "configure";

/// Parsed contents of all `#[configure]` attributes on one item.
#[derive(Default)]
struct ConfigureAttr {
    alias: Option<LitStr>,
    default: Option<LitStr>,
    optional: bool,
    base: bool,
    methods: bool,
    keys: Vec<(&'static str, Span)>,
}

impl ConfigureAttr {
    fn parse(attrs: &[Attribute]) -> syn::Result<Option<Self>> {
        let mut result: Option<Self> = None;
        for attr in attrs {
            if !attr.path().is_ident(CONFIGURE_ATTR) {
                continue;
            }
            let parsed = result.get_or_insert_with(Self::default);
            match &attr.meta {
                Meta::Path(_) => {}
                Meta::List(list) => {
                    // Shorthand alias: #[configure("user.name")]
                    if let Ok(alias) = syn::parse2::<LitStr>(list.tokens.clone()) {
                        parsed.keys.push(("alias", alias.span()));
                        parsed.alias = Some(alias);
                        continue;
                    }
                    attr.parse_nested_meta(|meta| {
                        let span = meta.path.span();
                        if meta.path.is_ident("alias") {
                            parsed.alias = Some(meta.value()?.parse()?);
                            parsed.keys.push(("alias", span));
                        } else if meta.path.is_ident("default") {
                            parsed.default = Some(meta.value()?.parse()?);
                            parsed.keys.push(("default", span));
                        } else if meta.path.is_ident("optional") {
                            parsed.optional = true;
                            parsed.keys.push(("optional", span));
                        } else if meta.path.is_ident("base") {
                            parsed.base = true;
                            parsed.keys.push(("base", span));
                        } else if meta.path.is_ident("methods") {
                            parsed.methods = true;
                            parsed.keys.push(("methods", span));
                        } else {
                            return Err(meta.error(format!(
                                "Unsupported #[{CONFIGURE_ATTR}] option, expected one of \
                                 alias, default, optional, base, methods"
                            )));
                        }
                        Ok(())
                    })?;
                }
                Meta::NameValue(meta) => {
                    return Err(Error::new(
                        meta.span(),
                        format!("Expected #[{CONFIGURE_ATTR}] or #[{CONFIGURE_ATTR}(...)]"),
                    ));
                }
            }
        }
        Ok(result)
    }

    fn allow(&self, allowed: &[&str], place: &str) -> syn::Result<()> {
        for (key, span) in &self.keys {
            if !allowed.contains(key) {
                return Err(Error::new(
                    *span,
                    format!("`{key}` is not supported on {place}"),
                ));
            }
        }
        Ok(())
    }

    fn alias_call(&self) -> proc_macro2::TokenStream {
        match &self.alias {
            Some(alias) => quote! { .alias(#alias) },
            None => quote! {},
        }
    }
}

fn is_configure_attr(attr: &Attribute) -> bool {
    attr.path().is_ident(CONFIGURE_ATTR)
}

fn returns_result(output: &ReturnType) -> Option<bool> {
    match output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(
            matches!(ty.as_ref(), Type::Path(type_path)
                if type_path.path.segments.last().is_some_and(|segment| {
                    segment.ident == "Result"
                        && matches!(segment.arguments, PathArguments::AngleBracketed(_))
                })),
        ),
    }
}

/// Derive macro for the Configurable trait
#[proc_macro_derive(Configurable, attributes(configure))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    handle_derive_configurable(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Attribute macro for impl blocks with configurable methods
///
/// The struct must be marked `#[configure(methods)]`, and each type can have
/// only one `#[configurable]` impl block.
#[proc_macro_attribute]
pub fn configurable(_attr: TokenStream, item: TokenStream) -> TokenStream {
    if let Ok(item_impl) = syn::parse::<ItemImpl>(item) {
        return handle_configurable_impl(item_impl)
            .unwrap_or_else(Error::into_compile_error)
            .into();
    }
    TokenStream::from(
        Error::new(
            Span::call_site(),
            "#[configurable] can only be applied to impl blocks",
        )
        .to_compile_error(),
    )
}

fn handle_derive_configurable(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(s) => &s.fields,
        _ => return Err(Error::new(name.span(), "Only structs are supported")),
    };

    let type_attr = ConfigureAttr::parse(&input.attrs)?.unwrap_or_default();
    type_attr.allow(&["methods"], "structs")?;

    let mut field_stmts = Vec::new();
    let mut base_stmt = None;

    match fields {
        syn::Fields::Named(fields) => {
            for field in &fields.named {
                let Some(attr) = ConfigureAttr::parse(&field.attrs)? else {
                    continue;
                };
                let Some(field_ident) = field.ident.as_ref() else {
                    continue;
                };
                let field_ty = &field.ty;

                if attr.base {
                    attr.allow(&["base"], "base fields")?;
                    if base_stmt.is_some() {
                        return Err(Error::new(
                            field_ident.span(),
                            "Only one base field is allowed",
                        ));
                    }
                    base_stmt = Some(quote! {
                        .base::<#field_ty>(|target| &mut target.#field_ident)
                    });
                    continue;
                }

                attr.allow(&["alias", "optional"], "fields")?;
                let ident_str = field_ident.unraw().to_string();
                let alias_call = attr.alias_call();
                let optional_call = if attr.optional {
                    quote! { .optional() }
                } else {
                    quote! {}
                };
                field_stmts.push(quote! {
                    .field::<#field_ty>(
                        ::infuse::FieldSpec::new(#ident_str) #alias_call #optional_call,
                        |target, value| target.#field_ident = value,
                    )
                });
            }
        }
        syn::Fields::Unnamed(_) => {
            return Err(Error::new(name.span(), "Tuple structs are not supported"));
        }
        syn::Fields::Unit => {}
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // The #[configurable] impl block implements ConfigurableMethods, which
    // requires DeclaresMethods, so neither half compiles without the other.
    let (methods_stmt, methods_impl) = if type_attr.methods {
        (
            quote! { <Self as ::infuse::__private::ConfigurableMethods>::methods(descriptor) },
            quote! {
                impl #impl_generics ::infuse::__private::DeclaresMethods
                    for #name #ty_generics #where_clause {}
            },
        )
    } else {
        (quote! { descriptor }, quote! {})
    };

    Ok(quote! {
        impl #impl_generics ::infuse::Configurable for #name #ty_generics #where_clause {
            fn descriptor() -> ::infuse::Descriptor<Self> {
                let descriptor = ::infuse::Descriptor::<Self>::new()
                    #(#field_stmts)*
                    #base_stmt;
                #methods_stmt
            }
        }

        #methods_impl
    })
}

fn handle_configurable_impl(input: ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if input.trait_.is_some() {
        return Err(Error::new(input.span(), "Trait impls are not supported"));
    }

    let self_ty = &input.self_ty;
    let mut method_calls = Vec::new();

    for item in &input.items {
        if let ImplItem::Fn(method) = item
            && let Some(attr) = ConfigureAttr::parse(&method.attrs)?
        {
            attr.allow(&["alias"], "methods")?;
            method_calls.push(configurable_method(method, &attr)?);
        }
    }

    // Remove configure attributes from methods and their parameters
    let mut cleaned_input = input.clone();
    for item in &mut cleaned_input.items {
        if let ImplItem::Fn(method) = item {
            method.attrs.retain(|attr| !is_configure_attr(attr));
            for fn_arg in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = fn_arg {
                    pat_type.attrs.retain(|attr| !is_configure_attr(attr));
                }
            }
        }
    }

    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #cleaned_input

        impl #impl_generics ::infuse::__private::ConfigurableMethods for #self_ty #where_clause {
            fn methods(
                descriptor: ::infuse::Descriptor<Self>,
            ) -> ::infuse::Descriptor<Self> {
                descriptor
                    #(#method_calls)*
            }
        }
    })
}

fn configurable_method(
    method: &ImplItemFn,
    attr: &ConfigureAttr,
) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &method.sig;
    let method_name = &sig.ident;
    if sig.asyncness.is_some() {
        return Err(Error::new(
            sig.span(),
            "Configurable methods must be synchronous",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new(
            sig.generics.span(),
            "Configurable methods cannot be generic",
        ));
    }

    let typed_count = sig
        .inputs
        .iter()
        .filter(|fn_arg| matches!(fn_arg, FnArg::Typed(_)))
        .count();
    let mut has_receiver = false;
    let mut param_calls = Vec::new();
    let mut arg_lets = Vec::new();
    let mut arg_names = Vec::new();

    for fn_arg in &sig.inputs {
        match fn_arg {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_none() {
                    return Err(Error::new(
                        receiver.span(),
                        "Configurable methods must take &self or &mut self",
                    ));
                }
                has_receiver = true;
            }
            FnArg::Typed(pat_type) => {
                let arg_ty = &pat_type.ty;
                if let Type::Reference(_) = arg_ty.as_ref() {
                    return Err(Error::new(
                        arg_ty.span(),
                        "Configurable parameters must be owned types",
                    ));
                }
                let param_attr = ConfigureAttr::parse(&pat_type.attrs)?.unwrap_or_default();
                param_attr.allow(&["alias", "default"], "parameters")?;

                let ident_call = match pat_type.pat.as_ref() {
                    Pat::Ident(pat_ident) => {
                        let ident_str = pat_ident.ident.unraw().to_string();
                        quote! { .ident(#ident_str) }
                    }
                    Pat::Wild(_) => {
                        if typed_count > 1 && param_attr.alias.is_none() {
                            return Err(Error::new(
                                pat_type.pat.span(),
                                "Unnamed parameters of multi-parameter methods need an alias",
                            ));
                        }
                        quote! {}
                    }
                    _ => {
                        return Err(Error::new(
                            pat_type.pat.span(),
                            "Only simple bindings supported",
                        ));
                    }
                };
                let alias_call = param_attr.alias_call();
                let default_call = match &param_attr.default {
                    Some(default) => quote! { .default(#default) },
                    None => quote! {},
                };
                param_calls.push(quote! {
                    .param(::infuse::ParamSpec::of::<#arg_ty>() #ident_call #alias_call #default_call)
                });

                let arg_name = format_ident!("arg{}", arg_names.len());
                arg_lets.push(quote! {
                    let #arg_name = args.take::<#arg_ty>()?;
                });
                arg_names.push(arg_name);
            }
        }
    }

    if !has_receiver {
        return Err(Error::new(
            sig.span(),
            "Configurable methods must take &self or &mut self",
        ));
    }

    let method_call = quote! { target.#method_name(#(#arg_names),*) };
    let call_stmt = match returns_result(&sig.output) {
        None => quote! { #method_call; },
        Some(true) => quote! { #method_call.map_err(::infuse::InvokeError::failed)?; },
        Some(false) => quote! { let _ = #method_call; },
    };

    let ident_str = method_name.unraw().to_string();
    let alias_call = attr.alias_call();

    Ok(quote! {
        .method(
            ::infuse::MethodSpec::new(#ident_str) #alias_call #(#param_calls)*,
            |target: &mut Self, args: &mut ::infuse::Arguments|
                -> ::std::result::Result<(), ::infuse::InvokeError> {
                #(#arg_lets)*
                #call_stmt
                Ok(())
            },
        )
    })
}
