#![doc = include_str!("../README.md")]

use proc_macro2::{Span, TokenStream};
use quote::quote_spanned;

mod emit;
mod parse;
mod rename;

/// Derives `FormSchema` and `FormValue` for a struct with named fields.
///
/// See the crate documentation for the accepted `#[form(...)]` attributes.
#[proc_macro_derive(FormSchema, attributes(form))]
pub fn derive_form_schema(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    match parse::parse_struct(input.into()) {
        Ok(parsed) => emit::emit(&parsed).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A compile error, reported at `span`.
#[derive(Debug)]
pub(crate) struct DeriveError {
    message: String,
    span: Span,
}

impl DeriveError {
    pub(crate) fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    #[cfg(test)]
    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    fn to_compile_error(&self) -> TokenStream {
        let message = &self.message;
        quote_spanned! { self.span =>
            ::core::compile_error!(#message);
        }
    }
}
