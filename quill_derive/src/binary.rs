use darling::{FromDeriveInput, FromVariant, ast};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(supports(enum_unit))]
struct BinaryDeriveInput {
    ident: syn::Ident,
    data: ast::Data<BinaryVariant, ()>,
}

#[derive(Debug, FromVariant)]
struct BinaryVariant {
    ident: syn::Ident,
}

pub fn operator_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_info = match BinaryDeriveInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &enum_info.ident;
    let variants = enum_info.data.take_enum().unwrap_or_default();

    let constructors = variants.iter().map(|var| {
        let var_name = &var.ident;
        let ctor = format_ident!("{}", var_name.to_string().to_snake_case());

        quote! {
            pub fn #ctor<L, R>(lhs: L, rhs: R) -> Self
            where
                L: crate::IntoExpr,
                R: crate::IntoExpr,
            {
                Self::compare(lhs, #enum_name::#var_name, rhs)
            }
        }
    });

    let methods = variants.iter().map(|var| {
        let var_name = &var.ident;
        let snake = var_name.to_string().to_snake_case();
        let where_fn = format_ident!("where_{}", snake);
        let or_where_fn = format_ident!("or_where_{}", snake);

        quote! {
            pub fn #where_fn<L, R>(&mut self, lhs: L, rhs: R) -> &mut Self
            where
                L: crate::IntoExpr,
                R: crate::IntoExpr,
            {
                self.and_where(crate::Criteria::compare(lhs, #enum_name::#var_name, rhs))
            }

            pub fn #or_where_fn<L, R>(&mut self, lhs: L, rhs: R) -> &mut Self
            where
                L: crate::IntoExpr,
                R: crate::IntoExpr,
            {
                self.or_where(crate::Criteria::compare(lhs, #enum_name::#var_name, rhs))
            }
        }
    });

    quote! {
        impl crate::Criteria {
            #(#constructors)*
        }

        impl crate::Select {
            #(#methods)*
        }
    }
    .into()
}
