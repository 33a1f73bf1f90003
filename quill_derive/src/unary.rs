use darling::{FromDeriveInput, FromVariant, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct UnaryInput {
    ident: syn::Ident,
    data: ast::Data<UnaryVariant, ()>,
}

#[derive(Debug, FromVariant)]
struct UnaryVariant {
    ident: syn::Ident,
}

pub fn unary_operator_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let op = match UnaryInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &op.ident;
    let methods = op
        .data
        .map_enum_variants(|v| {
            let var = &v.ident;
            let snake = var.to_string().to_snake_case();
            let ctor = format_ident!("is_{}", snake);
            let where_fn = format_ident!("where_{}", snake);
            let or_where_fn = format_ident!("or_where_{}", snake);

            quote! {
                impl crate::Criteria {
                    pub fn #ctor<E>(expr: E) -> Self
                    where
                        E: crate::IntoExpr,
                    {
                        Self::unary(expr, #enum_name::#var)
                    }
                }

                impl crate::Select {
                    pub fn #where_fn<E>(&mut self, expr: E) -> &mut Self
                    where
                        E: crate::IntoExpr,
                    {
                        self.and_where(crate::Criteria::unary(expr, #enum_name::#var))
                    }

                    pub fn #or_where_fn<E>(&mut self, expr: E) -> &mut Self
                    where
                        E: crate::IntoExpr,
                    {
                        self.or_where(crate::Criteria::unary(expr, #enum_name::#var))
                    }
                }
            }
        })
        .take_enum()
        .unwrap_or_default();

    quote! { #(#methods)* }.into()
}
