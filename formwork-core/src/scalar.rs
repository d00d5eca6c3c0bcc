//! Scalar coercion: one raw string in, one primitive value out.

use core::fmt;

/// Primitive semantic types a form value can be coerced into.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[non_exhaustive]
pub enum ScalarKind {
    /// `String`, taken verbatim
    Text,
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// A point in time, parsed from the layouts HTML date and time inputs
    /// send (see `parse_timestamp`, with the `chrono` feature)
    Timestamp,
    /// An exact decimal number
    Decimal,
}

impl ScalarKind {
    /// Name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Decimal => "decimal",
        }
    }

    /// Returns true for [`ScalarKind::Text`].
    ///
    /// Text is the only kind whose coercion cannot fail, so nullable text
    /// derives its validity from emptiness instead.
    pub const fn is_text(self) -> bool {
        matches!(self, ScalarKind::Text)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a raw string could not be coerced into a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarError {
    reason: String,
}

impl ScalarError {
    /// Creates an error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The human-readable reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl core::error::Error for ScalarError {}

/// A primitive type that can be parsed from a single form value.
pub trait Scalar: Default + Sized {
    /// The semantic kind of this scalar
    const KIND: ScalarKind;

    /// Strict parsing of `raw`.
    ///
    /// Used as-is by nullable wrappers: any failure means "no value".
    fn parse_strict(raw: &str) -> Result<Self, ScalarError>;

    /// Coercion for non-nullable fields. Same as [`Scalar::parse_strict`]
    /// unless the type has a fallback for some inputs.
    fn coerce(raw: &str) -> Result<Self, ScalarError> {
        Self::parse_strict(raw)
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        Ok(raw.to_owned())
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ScalarError::new(format!("invalid boolean `{raw}`"))),
        }
    }

    /// An unchecked checkbox is simply absent from the submission, so an
    /// empty value reads as `false`.
    fn coerce(raw: &str) -> Result<Self, ScalarError> {
        if raw.is_empty() {
            return Ok(false);
        }
        Self::parse_strict(raw)
    }
}

macro_rules! impl_from_str_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
                    raw.parse::<$ty>().map_err(|e| ScalarError::new(e.to_string()))
                }
            }
        )*
    };
}

impl_from_str_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

#[cfg(feature = "rust_decimal")]
impl Scalar for rust_decimal::Decimal {
    const KIND: ScalarKind = ScalarKind::Decimal;

    fn parse_strict(raw: &str) -> Result<Self, ScalarError> {
        use core::str::FromStr;

        rust_decimal::Decimal::from_str(raw)
            .or_else(|_| rust_decimal::Decimal::from_scientific(raw))
            .map_err(|e| ScalarError::new(e.to_string()))
    }
}
