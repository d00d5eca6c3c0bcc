use crate::{FieldKind, FormValue, Nullable, Scalar, Slot};

macro_rules! impl_scalar_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FormValue for $ty {
                const KIND: FieldKind = FieldKind::Scalar(<$ty as Scalar>::KIND);

                fn slot(&mut self) -> Slot<'_> {
                    Slot::Scalar(self)
                }
            }
        )*
    };
}

impl_scalar_value! {
    String, bool,
    i8, i16, i32, i64, isize,
    u8, u16, u32, u64, usize,
    f32, f64,
}

#[cfg(feature = "chrono")]
impl_scalar_value! {
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDate,
}

#[cfg(feature = "rust_decimal")]
impl_scalar_value!(rust_decimal::Decimal);

impl<S: Scalar> FormValue for Nullable<S> {
    const KIND: FieldKind = FieldKind::Nullable(S::KIND);

    fn slot(&mut self) -> Slot<'_> {
        Slot::Nullable(self)
    }
}

impl<S: Scalar> FormValue for Option<S> {
    const KIND: FieldKind = FieldKind::Nullable(S::KIND);

    fn slot(&mut self) -> Slot<'_> {
        Slot::Nullable(self)
    }
}

impl<E: FormValue> FormValue for Vec<E> {
    const KIND: FieldKind = FieldKind::Collection(&E::KIND);

    fn slot(&mut self) -> Slot<'_> {
        Slot::Collection(self)
    }
}
