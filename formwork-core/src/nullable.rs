use core::fmt;

use crate::{NullableSlot, Scalar, ScalarError, ScalarKind};

/// A scalar paired with a validity flag.
///
/// This is the shape of the SQL `NULL`-able column types that form values
/// usually end up in: `valid == false` means "no value", and `value` then
/// holds `T::default()`.
///
/// Decoding a `Nullable<T>` never fails. For text, `valid` is true when the
/// submitted string is non-empty; for every other kind, `valid` is true when
/// the string parsed.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nullable<T> {
    /// The wrapped value, `T::default()` when not valid
    pub value: T,

    /// Whether `value` holds a real value
    pub valid: bool,
}

impl<T> Nullable<T> {
    /// A present value.
    pub const fn new(value: T) -> Self {
        Self { value, valid: true }
    }

    /// Returns the value if present.
    pub fn as_option(&self) -> Option<&T> {
        self.valid.then_some(&self.value)
    }

    /// Converts into `Some(value)` if present.
    pub fn into_option(self) -> Option<T> {
        if self.valid { Some(self.value) } else { None }
    }
}

impl<T: Default> Nullable<T> {
    /// An absent value.
    pub fn null() -> Self {
        Self::default()
    }
}

impl<T: Default> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::null(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Nullable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.debug_tuple("Valid").field(&self.value).finish()
        } else {
            f.write_str("Null")
        }
    }
}

impl<S: Scalar> NullableSlot for Nullable<S> {
    fn scalar_kind(&self) -> ScalarKind {
        S::KIND
    }

    fn fill(&mut self, raw: &str) -> Result<(), ScalarError> {
        self.value = S::parse_strict(raw)?;
        self.valid = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.value = S::default();
        self.valid = false;
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

impl<S: Scalar> NullableSlot for Option<S> {
    fn scalar_kind(&self) -> ScalarKind {
        S::KIND
    }

    fn fill(&mut self, raw: &str) -> Result<(), ScalarError> {
        *self = Some(S::parse_strict(raw)?);
        Ok(())
    }

    fn clear(&mut self) {
        *self = None;
    }

    fn is_valid(&self) -> bool {
        self.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_round_trip() {
        formwork_testhelpers::setup();

        let present: Nullable<i32> = Some(4).into();
        assert_eq!(present, Nullable::new(4));
        assert_eq!(present.into_option(), Some(4));

        let absent: Nullable<i32> = None.into();
        assert_eq!(absent, Nullable { value: 0, valid: false });
        assert_eq!(absent.as_option(), None);
    }

    #[test]
    fn fill_failure_keeps_previous_value() {
        formwork_testhelpers::setup();

        let mut slot = Nullable::new(7i64);
        assert!(slot.fill("seven").is_err());
        assert_eq!(slot, Nullable::new(7));

        slot.clear();
        assert_eq!(slot, Nullable::null());
    }

    #[test]
    fn strict_bool_rejects_empty() {
        formwork_testhelpers::setup();

        let mut flag = Nullable::<bool>::null();
        assert!(flag.fill("").is_err());
        flag.fill("true").unwrap();
        assert!(flag.is_valid());
        assert!(flag.value);
    }

    #[test]
    fn option_slot() {
        formwork_testhelpers::setup();

        let mut age: Option<u8> = None;
        age.fill("41").unwrap();
        assert_eq!(age, Some(41));
        assert!(NullableSlot::is_valid(&age));
        age.clear();
        assert_eq!(age, None);
    }

    #[test]
    fn debug_output() {
        assert_eq!(format!("{:?}", Nullable::new("x")), r#"Valid("x")"#);
        assert_eq!(format!("{:?}", Nullable::<u8>::null()), "Null");
    }
}
