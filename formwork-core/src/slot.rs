//! Type-erased mutable access to the fields being decoded.
//!
//! A decoder never names the concrete field types: it asks a
//! [`FormSchema`] for the [`Slot`] of field `i` and drives it through one of
//! the object-safe traits below.

use crate::{FieldKind, FormSchema, Scalar, ScalarError, ScalarKind, Schema};

/// A mutable view of one value, tagged by how it is decoded.
pub enum Slot<'a> {
    /// A plain scalar
    Scalar(&'a mut dyn ScalarSlot),
    /// A scalar with a validity flag
    Nullable(&'a mut dyn NullableSlot),
    /// A nested struct
    Composite(&'a mut dyn CompositeSlot),
    /// A sequence of values
    Collection(&'a mut dyn CollectionSlot),
}

impl Slot<'_> {
    /// Short name of the slot category, matching [`FieldKind::category`].
    pub const fn category(&self) -> &'static str {
        match self {
            Slot::Scalar(_) => "scalar",
            Slot::Nullable(_) => "nullable",
            Slot::Composite(_) => "composite",
            Slot::Collection(_) => "collection",
        }
    }
}

/// A Rust type that can be a field of a [`FormSchema`].
pub trait FormValue: Default {
    /// How fields of this type are decoded
    const KIND: FieldKind;

    /// Erase the concrete type.
    fn slot(&mut self) -> Slot<'_>;
}

/// A plain scalar destination.
pub trait ScalarSlot {
    /// The scalar kind this slot parses
    fn scalar_kind(&self) -> ScalarKind;

    /// Replace the value with `raw` coerced by [`Scalar::coerce`].
    ///
    /// On error the previous value is left untouched.
    fn coerce(&mut self, raw: &str) -> Result<(), ScalarError>;
}

impl<S: Scalar> ScalarSlot for S {
    fn scalar_kind(&self) -> ScalarKind {
        S::KIND
    }

    fn coerce(&mut self, raw: &str) -> Result<(), ScalarError> {
        *self = S::coerce(raw)?;
        Ok(())
    }
}

/// A scalar destination that can hold "no value".
pub trait NullableSlot {
    /// The scalar kind of the wrapped value
    fn scalar_kind(&self) -> ScalarKind;

    /// Store `raw` parsed by [`Scalar::parse_strict`] and mark the value
    /// present.
    ///
    /// On error the previous value is left untouched.
    fn fill(&mut self, raw: &str) -> Result<(), ScalarError>;

    /// Reset to the default value and mark it absent.
    fn clear(&mut self);

    /// Whether a value is present.
    fn is_valid(&self) -> bool;
}

/// A nested struct destination.
pub trait CompositeSlot {
    /// The schema of the nested struct
    fn schema(&self) -> &'static Schema;

    /// Mutable access to field `index` of [`CompositeSlot::schema`].
    fn slot_at(&mut self, index: usize) -> Option<Slot<'_>>;
}

impl<T: FormSchema> CompositeSlot for T {
    fn schema(&self) -> &'static Schema {
        T::SCHEMA
    }

    fn slot_at(&mut self, index: usize) -> Option<Slot<'_>> {
        <T as FormSchema>::field_slot(self, index)
    }
}

/// A sequence destination.
pub trait CollectionSlot {
    /// Replace the contents with `len` default-valued elements.
    fn reset(&mut self, len: usize);

    /// Mutable access to element `index`.
    fn element(&mut self, index: usize) -> Option<Slot<'_>>;
}

impl<E: FormValue> CollectionSlot for Vec<E> {
    fn reset(&mut self, len: usize) {
        self.clear();
        self.resize_with(len, E::default);
    }

    fn element(&mut self, index: usize) -> Option<Slot<'_>> {
        self.get_mut(index).map(|element| element.slot())
    }
}
