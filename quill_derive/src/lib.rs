use proc_macro::TokenStream;

mod between;
mod binary;
mod unary;

/// Generates a `Criteria` constructor plus `where_*` / `or_where_*` select
/// helpers for every comparison operator variant.
#[proc_macro_derive(BinaryOperator)]
pub fn operator_methods(input: TokenStream) -> TokenStream {
    binary::operator_methods_impl(input)
}

#[proc_macro_derive(UnaryOperator)]
pub fn unary_operator_methods(input: TokenStream) -> TokenStream {
    unary::unary_operator_methods_impl(input)
}

#[proc_macro_derive(BetweenOperator)]
pub fn between_operator_methods(input: TokenStream) -> TokenStream {
    between::between_operator_methods_impl(input)
}
