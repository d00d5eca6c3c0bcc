//! The `Form<T>` and `Query<T>` wrappers.

use core::fmt;
use core::ops::{Deref, DerefMut};

macro_rules! wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name<T>(pub T);

        impl<T> $name<T> {
            /// Consumes the wrapper and returns the inner value.
            #[inline]
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T> From<T> for $name<T> {
            #[inline]
            fn from(inner: T) -> Self {
                $name(inner)
            }
        }

        impl<T> Deref for $name<T> {
            type Target = T;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T> DerefMut for $name<T> {
            #[inline]
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<T> AsRef<T> for $name<T> {
            #[inline]
            fn as_ref(&self) -> &T {
                &self.0
            }
        }

        impl<T> AsMut<T> for $name<T> {
            #[inline]
            fn as_mut(&mut self) -> &mut T {
                &mut self.0
            }
        }

        impl<T: fmt::Display> fmt::Display for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

wrapper! {
    /// A value decoded from a form-urlencoded request body.
    ///
    /// With the `axum` feature, this is an extractor: the request must carry
    /// `Content-Type: application/x-www-form-urlencoded`.
    ///
    /// ```
    /// use formwork::FormSchema;
    /// use formwork_urlencoded::Form;
    ///
    /// #[derive(FormSchema, Default)]
    /// struct Login {
    ///     username: String,
    /// }
    ///
    /// let form = Form(formwork_urlencoded::from_str::<Login>("username=alice").unwrap());
    /// assert_eq!(form.username, "alice");
    /// ```
    Form
}

wrapper! {
    /// A value decoded from the query string of a request URI.
    ///
    /// With the `axum` feature, this is an extractor.
    Query
}
