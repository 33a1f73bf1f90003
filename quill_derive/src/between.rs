use darling::{FromDeriveInput, FromVariant, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct BetweenInput {
    ident: syn::Ident,
    data: ast::Data<BetweenVariant, ()>,
}

#[derive(Debug, FromVariant)]
struct BetweenVariant {
    ident: syn::Ident,
}

pub fn between_operator_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let op = match BetweenInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &op.ident;
    let methods = op
        .data
        .map_enum_variants(|v| {
            let var = &v.ident;
            let snake = var.to_string().to_snake_case();
            let ctor = format_ident!("{}", snake);
            let where_fn = format_ident!("where_{}", snake);
            let or_where_fn = format_ident!("or_where_{}", snake);

            quote! {
                impl crate::Criteria {
                    pub fn #ctor<E, L, H>(expr: E, low: L, high: H) -> Self
                    where
                        E: crate::IntoExpr,
                        L: crate::IntoExpr,
                        H: crate::IntoExpr,
                    {
                        Self::range(expr, #enum_name::#var, low, high)
                    }
                }

                impl crate::Select {
                    pub fn #where_fn<E, L, H>(&mut self, expr: E, low: L, high: H) -> &mut Self
                    where
                        E: crate::IntoExpr,
                        L: crate::IntoExpr,
                        H: crate::IntoExpr,
                    {
                        self.and_where(crate::Criteria::range(expr, #enum_name::#var, low, high))
                    }

                    pub fn #or_where_fn<E, L, H>(&mut self, expr: E, low: L, high: H) -> &mut Self
                    where
                        E: crate::IntoExpr,
                        L: crate::IntoExpr,
                        H: crate::IntoExpr,
                    {
                        self.or_where(crate::Criteria::range(expr, #enum_name::#var, low, high))
                    }
                }
            }
        })
        .take_enum()
        .unwrap_or_default();

    quote! { #(#methods)* }.into()
}
