use formwork_core::NullableSlot;
use tracing::trace;

use crate::decode::Decoder;

impl Decoder<'_> {
    /// Fills a nullable scalar. Never fails.
    ///
    /// Text is valid when non-empty. Every other kind is valid when the raw
    /// value parses; a parse failure, an empty value included, leaves the
    /// default value marked invalid.
    pub(crate) fn nullable(&self, slot: &mut dyn NullableSlot, raw: &str) {
        let kind = slot.scalar_kind();
        if kind.is_text() && raw.is_empty() {
            slot.clear();
            return;
        }
        if let Err(err) = slot.fill(raw) {
            trace!(
                path = %self.path(),
                raw,
                %kind,
                reason = err.reason(),
                "nullable value absorbed as null"
            );
            slot.clear();
        }
    }
}
