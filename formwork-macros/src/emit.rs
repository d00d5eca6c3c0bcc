use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::parse::ParsedStruct;

/// Generates the `FormSchema` impl (static schema plus match-based field
/// accessor) and the `FormValue` impl that lets the struct nest.
pub(crate) fn emit(parsed: &ParsedStruct) -> TokenStream {
    let name = &parsed.name;
    let type_name = name.to_string();
    let type_name = type_name.strip_prefix("r#").unwrap_or(&type_name);

    let descriptors = parsed.fields.iter().map(|field| {
        let effective = &field.effective;
        let ty = &field.ty;
        quote! {
            ::formwork::Field::new(#effective, <#ty as ::formwork::FormValue>::KIND)
        }
    });

    let arms = parsed.fields.iter().enumerate().map(|(index, field)| {
        let index = Literal::usize_unsuffixed(index);
        let ident = &field.ident;
        quote! {
            #index => ::core::option::Option::Some(::formwork::FormValue::slot(&mut self.#ident)),
        }
    });

    quote! {
        #[automatically_derived]
        impl ::formwork::FormSchema for #name {
            const SCHEMA: &'static ::formwork::Schema = &::formwork::Schema {
                type_name: #type_name,
                fields: &[#(#descriptors),*],
            };

            fn field_slot(&mut self, index: usize) -> ::core::option::Option<::formwork::Slot<'_>> {
                match index {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        #[automatically_derived]
        impl ::formwork::FormValue for #name {
            const KIND: ::formwork::FieldKind =
                ::formwork::FieldKind::Composite(::formwork::schema_of::<Self>);

            fn slot(&mut self) -> ::formwork::Slot<'_> {
                ::formwork::Slot::Composite(self)
            }
        }
    }
}
