use core::fmt;

use crate::{ScalarKind, Slot};

/// Static description of a form-decodable struct.
///
/// Field order is significant: the decoder visits fields in this order and
/// stops at the first fatal error.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    /// Name of the described type, for diagnostics
    pub type_name: &'static str,

    /// All decodable fields, in declaration order
    pub fields: &'static [Field],
}

impl Schema {
    /// Look up a field by its (effective) name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of the named field, as accepted by [`FormSchema::field_slot`].
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", field.name, field.kind)?;
        }
        if !self.fields.is_empty() {
            write!(f, " ")?;
        }
        write!(f, "}}")
    }
}

/// Describes one field of a [`Schema`].
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Key-path segment for this field. Used verbatim, so `#[form(rename)]`
    /// has already been applied.
    pub name: &'static str,

    /// How the decoder fills this field
    pub kind: FieldKind,
}

impl Field {
    /// Creates a field descriptor. Used by the derive macro.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Lazily resolves the schema of a composite field.
///
/// The indirection allows recursive types (`struct Node { children: Vec<Node> }`).
pub type SchemaFn = fn() -> &'static Schema;

/// Semantic kind of a field, driving decoder dispatch.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A plain scalar: parse failures are errors
    Scalar(ScalarKind),

    /// A scalar with a validity flag: parse failures become "no value"
    Nullable(ScalarKind),

    /// A nested struct, addressed with `field.child` keys
    Composite(SchemaFn),

    /// A sequence, addressed either with repeated `field` keys or with
    /// `field[index]` keys
    Collection(&'static FieldKind),

    /// A field the decoder has no strategy for. Decoding it always fails.
    Opaque(&'static str),
}

impl FieldKind {
    /// Short name of the kind category, without element or scalar details.
    pub const fn category(&self) -> &'static str {
        match self {
            FieldKind::Scalar(_) => "scalar",
            FieldKind::Nullable(_) => "nullable",
            FieldKind::Composite(_) => "composite",
            FieldKind::Collection(_) => "collection",
            FieldKind::Opaque(_) => "opaque",
        }
    }

    /// The nested schema, for composite fields.
    pub fn schema(&self) -> Option<&'static Schema> {
        match self {
            FieldKind::Composite(schema) => Some(schema()),
            _ => None,
        }
    }

    /// The scalar kind, for scalar and nullable fields.
    pub const fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            FieldKind::Scalar(kind) | FieldKind::Nullable(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The element kind, for collection fields.
    pub const fn element(&self) -> Option<&'static FieldKind> {
        match self {
            FieldKind::Collection(element) => Some(*element),
            _ => None,
        }
    }

    /// Returns true if `slot` is the slot variant this kind expects.
    pub fn accepts(&self, slot: &Slot<'_>) -> bool {
        matches!(
            (self, slot),
            (FieldKind::Scalar(_), Slot::Scalar(_))
                | (FieldKind::Nullable(_), Slot::Nullable(_))
                | (FieldKind::Composite(_), Slot::Composite(_))
                | (FieldKind::Collection(_), Slot::Collection(_))
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => write!(f, "{kind}"),
            FieldKind::Nullable(kind) => write!(f, "nullable<{kind}>"),
            FieldKind::Composite(schema) => write!(f, "{}", schema().type_name),
            FieldKind::Collection(element) => write!(f, "collection<{element}>"),
            FieldKind::Opaque(type_name) => write!(f, "opaque<{type_name}>"),
        }
    }
}

// Composite schemas are printed by name only: printing them in full would
// never terminate for recursive types.
impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            FieldKind::Nullable(kind) => f.debug_tuple("Nullable").field(kind).finish(),
            FieldKind::Composite(schema) => f
                .debug_tuple("Composite")
                .field(&schema().type_name)
                .finish(),
            FieldKind::Collection(element) => f.debug_tuple("Collection").field(element).finish(),
            FieldKind::Opaque(type_name) => f.debug_tuple("Opaque").field(type_name).finish(),
        }
    }
}

/// A struct that can be decoded field by field.
///
/// Implemented by `#[derive(FormSchema)]`. Hand-written implementations must
/// keep [`FormSchema::field_slot`] consistent with [`FormSchema::SCHEMA`]:
/// index `i` returns the slot for `SCHEMA.fields[i]`.
pub trait FormSchema: Default {
    /// The static description of this type
    const SCHEMA: &'static Schema;

    /// Mutable, type-erased access to the field at `index`.
    ///
    /// Returns `None` for out-of-range indices.
    fn field_slot(&mut self, index: usize) -> Option<Slot<'_>>;
}

/// Resolves the schema of `T`. Used as a [`SchemaFn`] by composite kinds.
pub fn schema_of<T: FormSchema>() -> &'static Schema {
    T::SCHEMA
}
