#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod collection;
mod composite;
mod decode;
mod nullable;

mod error;
pub use error::{DecodeError, DecodeErrorKind, FieldPath, PathSegment};

mod form;
pub use form::{Form, Query};

mod keypath;
pub use keypath::{KeyPath, Segment};

mod options;
pub use options::DecodeOptions;

mod raw;
pub use raw::RawForm;

pub use decode::{decode_into, from_form, from_form_with, from_str, from_str_with};

#[cfg(feature = "axum")]
mod axum;
#[cfg(feature = "axum")]
pub use self::axum::{FormRejection, QueryRejection};
