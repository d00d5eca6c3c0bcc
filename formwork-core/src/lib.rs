#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod schema;
pub use schema::*;

mod scalar;
pub use scalar::*;

mod slot;
pub use slot::*;

mod nullable;
pub use nullable::*;

#[cfg(feature = "chrono")]
mod timestamp;
#[cfg(feature = "chrono")]
pub use timestamp::parse_timestamp;

mod impls;
