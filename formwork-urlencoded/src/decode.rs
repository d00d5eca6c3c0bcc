use formwork_core::{CompositeSlot, FieldKind, FormSchema, ScalarSlot, Slot};
use tracing::{debug, trace};

use crate::keypath::KeyNode;
use crate::{DecodeError, DecodeErrorKind, DecodeOptions, FieldPath, PathSegment, RawForm};

/// Decodes `form` into a fresh `T`, with the default [`DecodeOptions`].
///
/// Fields are visited in schema order and decoding stops at the first
/// error.
pub fn from_form<T: FormSchema>(form: &RawForm) -> Result<T, DecodeError> {
    from_form_with(form, &DecodeOptions::default())
}

/// Decodes `form` into a fresh `T`.
pub fn from_form_with<T: FormSchema>(
    form: &RawForm,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    let mut value = T::default();
    decode_into(&mut value, form, options)?;
    Ok(value)
}

/// Parses `application/x-www-form-urlencoded` text (a leading `?` is
/// ignored) and decodes it into a fresh `T`.
pub fn from_str<T: FormSchema>(input: &str) -> Result<T, DecodeError> {
    from_form(&RawForm::parse(input))
}

/// Like [`from_str`], with explicit options.
pub fn from_str_with<T: FormSchema>(input: &str, options: &DecodeOptions) -> Result<T, DecodeError> {
    from_form_with(&RawForm::parse(input), options)
}

/// Decodes `form` into an existing value, field by field.
///
/// Every field of the schema is written, so nothing of the previous
/// contents survives except `#[form(skip)]` fields. On error, the fields
/// before the failing one have already been written: discard `value`.
pub fn decode_into<T: FormSchema>(
    value: &mut T,
    form: &RawForm,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    let tree = KeyNode::from_form(form, options);
    debug!(type_name = T::SCHEMA.type_name, keys = form.len(), "decoding form");

    let mut decoder = Decoder::new(options);
    let result = decoder.decode_fields(value, &tree);
    match &result {
        Ok(()) => debug!(type_name = T::SCHEMA.type_name, "decoded form"),
        Err(err) => debug!(type_name = T::SCHEMA.type_name, error = %err, "form decoding failed"),
    }
    result
}

/// Walks a schema against the key-path trie, keeping track of where it is.
pub(crate) struct Decoder<'o> {
    options: &'o DecodeOptions,
    path: FieldPath,
    depth: usize,
    /// Collection elements allocated so far
    elements: usize,
}

impl<'o> Decoder<'o> {
    fn new(options: &'o DecodeOptions) -> Self {
        Self {
            options,
            path: FieldPath::new(),
            depth: 0,
            elements: 0,
        }
    }

    pub(crate) fn options(&self) -> &DecodeOptions {
        self.options
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.path.clone(), kind)
    }

    /// Runs `f` with `segment` appended to the current path.
    ///
    /// The segment is left in place on error, so that the error built from
    /// the innermost path is the one reported.
    pub(crate) fn at<R>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        self.path.push(segment);
        let value = f(self)?;
        self.path.pop();
        Ok(value)
    }

    /// Runs `f` one nesting level deeper, failing once
    /// [`DecodeOptions::max_depth`] is reached.
    pub(crate) fn descend<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, DecodeError>,
    ) -> Result<R, DecodeError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(DecodeErrorKind::DepthLimitExceeded {
                limit: self.options.max_depth,
            }));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Counts `len` more collection elements against
    /// [`DecodeOptions::max_elements`], before they are allocated.
    pub(crate) fn reserve_elements(&mut self, len: usize) -> Result<(), DecodeError> {
        let limit = self.options.max_elements;
        match self.elements.checked_add(len) {
            Some(total) if total <= limit => {
                self.elements = total;
                Ok(())
            }
            _ => Err(self.error(DecodeErrorKind::TooManyElements { limit })),
        }
    }

    /// Decodes every field of `target`'s schema from `node`, in order.
    pub(crate) fn decode_fields(
        &mut self,
        target: &mut dyn CompositeSlot,
        node: &KeyNode<'_>,
    ) -> Result<(), DecodeError> {
        let schema = target.schema();
        for (index, field) in schema.fields.iter().enumerate() {
            let child = node.child(field.name).unwrap_or(KeyNode::empty());
            self.at(PathSegment::Field(field.name), |d| {
                trace!(path = %d.path, kind = %field.kind, "decoding field");
                d.decode_slot(&field.kind, target.slot_at(index), child)
            })?;
        }
        Ok(())
    }

    /// Dispatches on the declared kind. A slot of another kind, or no slot
    /// at all, means the field cannot be decoded.
    pub(crate) fn decode_slot(
        &mut self,
        kind: &FieldKind,
        slot: Option<Slot<'_>>,
        node: &KeyNode<'_>,
    ) -> Result<(), DecodeError> {
        match (kind, slot) {
            (FieldKind::Scalar(_), Some(Slot::Scalar(slot))) => {
                self.scalar(slot, node.first_value().unwrap_or_default())
            }
            (FieldKind::Nullable(_), Some(Slot::Nullable(slot))) => {
                self.nullable(slot, node.first_value().unwrap_or_default());
                Ok(())
            }
            (FieldKind::Composite(_), Some(Slot::Composite(slot))) => self.compose(slot, node),
            (FieldKind::Collection(element), Some(Slot::Collection(slot))) => {
                self.collection(element, slot, node)
            }
            (kind, _) => Err(self.error(DecodeErrorKind::UnknownFieldKind {
                kind: kind.to_string(),
            })),
        }
    }

    /// Coerces one raw value into a non-nullable scalar. An absent key
    /// arrives here as `""`.
    pub(crate) fn scalar(&self, slot: &mut dyn ScalarSlot, raw: &str) -> Result<(), DecodeError> {
        let kind = slot.scalar_kind();
        slot.coerce(raw).map_err(|err| {
            self.error(DecodeErrorKind::Parse {
                raw: raw.to_owned(),
                kind,
                reason: err.reason().to_owned(),
            })
        })
    }
}
