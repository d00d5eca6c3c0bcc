use formwork_core::CompositeSlot;

use crate::DecodeError;
use crate::decode::Decoder;
use crate::keypath::KeyNode;

impl Decoder<'_> {
    /// Decodes a nested struct from the sub-tree of its field. Without any
    /// key under the field, every nested field is decoded from empty input,
    /// so absence is settled at the leaves.
    pub(crate) fn compose(
        &mut self,
        target: &mut dyn CompositeSlot,
        node: &KeyNode<'_>,
    ) -> Result<(), DecodeError> {
        self.descend(|d| d.decode_fields(target, node))
    }
}
