#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub use formwork_core::*;

/// Derives [`FormSchema`](trait@FormSchema) and [`FormValue`] for a struct
/// with named fields.
///
/// Field attributes: `#[form(rename = "Name")]`, `#[form(skip)]`.
/// Struct attributes: `#[form(rename_all = "PascalCase")]` and the other
/// usual case rules.
pub use formwork_macros::FormSchema;
