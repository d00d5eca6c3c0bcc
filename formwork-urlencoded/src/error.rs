use core::fmt;

use formwork_core::ScalarKind;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// A field, by its schema name
    Field(&'static str),
    /// A collection element
    Index(usize),
}

/// Where in the destination value an error happened, e.g.
/// `Order.Items[3].Quantity`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the value being decoded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Removes the last segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true for the path of the value being decoded.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// The first fatal problem found while decoding, with the path of the
/// field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    path: FieldPath,
    kind: DecodeErrorKind,
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// A raw value could not be coerced into a non-nullable scalar.
    Parse {
        /// The submitted value
        raw: String,
        /// The scalar kind of the field
        kind: ScalarKind,
        /// Why coercion failed
        reason: String,
    },

    /// A bracket did not hold a non-negative decimal index.
    Index {
        /// The text between the brackets
        token: String,
    },

    /// An index was above [`DecodeOptions::max_index`](crate::DecodeOptions::max_index).
    IndexTooLarge {
        /// The largest index submitted
        index: usize,
        /// The configured limit
        limit: usize,
    },

    /// The field's kind has no decoder, or its accessor does not match
    /// its declared kind.
    UnknownFieldKind {
        /// The declared kind, as displayed
        kind: String,
    },

    /// A collection of composites (or of collections) was submitted as
    /// repeated values instead of indexed keys.
    FlatCompositeElement {
        /// The element kind, as displayed
        type_name: String,
    },

    /// The collections of one call would hold more elements than
    /// [`DecodeOptions::max_elements`](crate::DecodeOptions::max_elements).
    TooManyElements {
        /// The configured limit
        limit: usize,
    },

    /// Composites and collections were nested deeper than
    /// [`DecodeOptions::max_depth`](crate::DecodeOptions::max_depth).
    DepthLimitExceeded {
        /// The configured limit
        limit: usize,
    },
}

impl DecodeError {
    pub(crate) fn new(path: FieldPath, kind: DecodeErrorKind) -> Self {
        Self { path, kind }
    }

    /// The field the error concerns.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// What went wrong.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Consumes the error, returning what went wrong.
    pub fn into_kind(self) -> DecodeErrorKind {
        self.kind
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Parse { raw, kind, reason } => {
                write!(f, "cannot parse `{raw}` as {kind}: {reason}")
            }
            DecodeErrorKind::Index { token } => {
                write!(f, "invalid collection index `{token}`")
            }
            DecodeErrorKind::IndexTooLarge { index, limit } => {
                write!(f, "collection index {index} is above the limit of {limit}")
            }
            DecodeErrorKind::UnknownFieldKind { kind } => {
                write!(f, "no decoder for field kind `{kind}`")
            }
            DecodeErrorKind::FlatCompositeElement { type_name } => {
                write!(
                    f,
                    "`{type_name}` elements must be submitted with indexed keys, not repeated values"
                )
            }
            DecodeErrorKind::TooManyElements { limit } => {
                write!(f, "collections would hold more than the limit of {limit} elements")
            }
            DecodeErrorKind::DepthLimitExceeded { limit } => {
                write!(f, "nesting is deeper than the limit of {limit}")
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl core::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_rendering() {
        let mut path = FieldPath::new();
        assert_eq!(path.to_string(), "");

        path.push(PathSegment::Field("Order"));
        path.push(PathSegment::Field("Items"));
        path.push(PathSegment::Index(3));
        path.push(PathSegment::Field("Name"));
        assert_eq!(path.to_string(), "Order.Items[3].Name");

        assert_eq!(path.pop(), Some(PathSegment::Field("Name")));
        path.push(PathSegment::Index(0));
        assert_eq!(path.to_string(), "Order.Items[3][0]");
    }

    #[test]
    fn error_rendering() {
        let mut path = FieldPath::new();
        path.push(PathSegment::Field("Age"));
        let err = DecodeError::new(
            path,
            DecodeErrorKind::Parse {
                raw: "oops".into(),
                kind: ScalarKind::I64,
                reason: "invalid digit found in string".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Age: cannot parse `oops` as i64: invalid digit found in string"
        );
    }
}
