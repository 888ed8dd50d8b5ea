use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{
    parse_macro_input, spanned::Spanned, Attribute, Data, DeriveInput, Fields, Index, Path,
};

// =============================================================================
// #[derive(WalkAst)]
// =============================================================================

#[proc_macro_derive(WalkAst)]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match generate_walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl crate::walk::Walk for #name {
            #[inline]
            #[allow(unused_variables)]
            fn walk<V: crate::walk::Visitor + ?Sized>(
                &self,
                v: &mut V,
            ) -> ::core::result::Result<(), V::Error> {
                #walk_body
                Ok(())
            }
        }
    };

    expanded.into()
}

fn generate_walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => Ok(generate_fields_walk(&data_struct.fields)),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_walk_arm(&variant.ident, &variant.fields));

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

fn generate_fields_walk(fields: &Fields) -> proc_macro2::TokenStream {
    let walk_calls = fields.iter().enumerate().map(|(i, field)| {
        let access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        quote! { crate::walk::Walk::walk(#access, v)?; }
    });

    quote! { #(#walk_calls)* }
}

fn generate_walk_arm(variant: &syn::Ident, fields: &Fields) -> proc_macro2::TokenStream {
    let bindings = field_bindings(fields, "f");
    let calls = bindings
        .iter()
        .map(|b| quote! { crate::walk::Walk::walk(#b, v)?; });
    let pattern = variant_pattern(variant, fields, &bindings);

    quote! {
        #pattern => {
            #(#calls)*
        }
    }
}

// =============================================================================
// #[derive(UnifyAst)]
// =============================================================================

/// Generates `crate::unify::Unify` for a tree node.
///
/// Field attribute `#[unify(ignore)]` marks a non-structural link: it always
/// unifies and is reset to `Default::default()` by substitution.
///
/// Type attributes `#[unify(pre_unify = path)]` and `#[unify(pre_subst = path)]`
/// name hooks that run before the structural code; a hook returning `Some`
/// decides the result.
#[proc_macro_derive(UnifyAst, attributes(unify))]
pub fn derive_unify_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_unify(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

#[derive(Default)]
struct TypeHooks {
    pre_unify: Option<Path>,
    pre_subst: Option<Path>,
}

fn type_hooks(attrs: &[Attribute]) -> syn::Result<TypeHooks> {
    let mut hooks = TypeHooks::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("unify")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("pre_unify") {
                hooks.pre_unify = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("pre_subst") {
                hooks.pre_subst = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `pre_unify` or `pre_subst`"))
            }
        })?;
    }
    Ok(hooks)
}

fn is_ignored(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut ignored = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("unify")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("ignore") {
                ignored = true;
                Ok(())
            } else {
                Err(meta.error("expected `ignore`"))
            }
        })?;
    }
    Ok(ignored)
}

fn expand_unify(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let hooks = type_hooks(&input.attrs)?;

    let (unify_body, subst_body) = match &input.data {
        Data::Struct(data) => struct_unify(&data.fields)?,
        Data::Enum(data) => {
            let mut unify_arms = Vec::new();
            let mut subst_arms = Vec::new();
            for variant in &data.variants {
                let (u, s) = variant_unify(&variant.ident, &variant.fields)?;
                unify_arms.push(u);
                subst_arms.push(s);
            }
            (
                quote! {
                    match (self, other) {
                        #(#unify_arms)*
                        _ => false,
                    }
                },
                quote! {
                    match self {
                        #(#subst_arms)*
                    }
                },
            )
        }
        Data::Union(u) => {
            return Err(syn::Error::new_spanned(
                u.union_token,
                "UnifyAst cannot be derived for unions",
            ))
        }
    };

    let pre_unify = hooks.pre_unify.map(|path| {
        quote! {
            if let ::core::option::Option::Some(decided) = #path(self, other, cx) {
                return decided;
            }
        }
    });
    let pre_subst = hooks.pre_subst.map(|path| {
        quote! {
            if let ::core::option::Option::Some(replaced) = #path(self, cx) {
                return replaced;
            }
        }
    });

    Ok(quote! {
        impl crate::unify::Unify for #name {
            #[allow(unused_variables, unreachable_patterns)]
            fn unify(&self, other: &Self, cx: &mut crate::unify::UnifyCx<'_>) -> bool {
                #pre_unify
                #unify_body
            }

            #[allow(unused_variables)]
            fn subst(&self, cx: &mut crate::unify::SubstCx<'_>) -> Self {
                #pre_subst
                #subst_body
            }
        }
    })
}

fn struct_unify(
    fields: &Fields,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    let mut checks = Vec::new();
    let mut inits = Vec::new();

    for (i, field) in fields.iter().enumerate() {
        let ignored = is_ignored(&field.attrs)?;
        let access = match &field.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = Index::from(i);
                quote! { #index }
            }
        };
        if !ignored {
            checks.push(quote! {
                crate::unify::Unify::unify(&self.#access, &other.#access, cx)
            });
        }
        let value = if ignored {
            quote! { ::core::default::Default::default() }
        } else {
            quote! { crate::unify::Unify::subst(&self.#access, cx) }
        };
        inits.push(match &field.ident {
            Some(ident) => quote! { #ident: #value },
            None => value,
        });
    }

    let unify = quote! { true #(&& #checks)* };
    let subst = match fields {
        Fields::Named(_) => quote! { Self { #(#inits),* } },
        Fields::Unnamed(_) => quote! { Self(#(#inits),*) },
        Fields::Unit => quote! { Self },
    };
    Ok((unify, subst))
}

fn variant_unify(
    variant: &syn::Ident,
    fields: &Fields,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    let left = field_bindings(fields, "l");
    let right = field_bindings(fields, "r");

    let mut checks = Vec::new();
    let mut values = Vec::new();
    for ((field, l), r) in fields.iter().zip(&left).zip(&right) {
        if is_ignored(&field.attrs)? {
            values.push(quote! { ::core::default::Default::default() });
        } else {
            checks.push(quote! { crate::unify::Unify::unify(#l, #r, cx) });
            values.push(quote! { crate::unify::Unify::subst(#l, cx) });
        }
    }

    let left_pat = variant_pattern(variant, fields, &left);
    let right_pat = variant_pattern(variant, fields, &right);
    let unify_arm = quote! {
        (#left_pat, #right_pat) => true #(&& #checks)*,
    };

    let rebuilt = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().filter_map(|f| f.ident.as_ref());
            quote! { Self::#variant { #(#names: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self::#variant(#(#values),*) },
        Fields::Unit => quote! { Self::#variant },
    };
    let subst_arm = quote! {
        #left_pat => #rebuilt,
    };

    Ok((unify_arm, subst_arm))
}

// =============================================================================
// Shared helpers
// =============================================================================

fn field_bindings(fields: &Fields, prefix: &str) -> Vec<syn::Ident> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| match &field.ident {
            Some(ident) => format_ident!("{}_{}", prefix, ident),
            None => format_ident!("{}{}", prefix, i),
        })
        .collect()
}

fn variant_pattern(
    variant: &syn::Ident,
    fields: &Fields,
    bindings: &[syn::Ident],
) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! { Self::#variant },
        Fields::Named(named) => {
            let names = named.named.iter().filter_map(|f| f.ident.as_ref());
            quote! { Self::#variant { #(#names: #bindings),* } }
        }
        Fields::Unnamed(_) => quote! { Self::#variant(#(#bindings),*) },
    }
}
