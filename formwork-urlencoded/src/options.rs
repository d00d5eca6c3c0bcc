/// Limits applied while decoding.
///
/// ```
/// use formwork_urlencoded::DecodeOptions;
///
/// let options = DecodeOptions::new().with_max_depth(8).with_max_index(255);
/// assert_eq!(options.max_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// How many composites and collections may be nested inside the
    /// top-level value. Defaults to 32.
    pub max_depth: usize,

    /// The largest accepted collection index. Indexed collections are
    /// allocated up front to `index + 1` elements, so this bounds what a
    /// single key can make the decoder allocate. Defaults to 10 000.
    pub max_index: usize,

    /// How many collection elements one call may allocate, all collections
    /// together. Nested indexed collections multiply, so `max_index` alone
    /// does not bound a whole call. Defaults to 100 000.
    pub max_elements: usize,
}

impl DecodeOptions {
    /// The default limits.
    pub const fn new() -> Self {
        Self {
            max_depth: 32,
            max_index: 10_000,
            max_elements: 100_000,
        }
    }

    /// Sets [`DecodeOptions::max_depth`].
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets [`DecodeOptions::max_index`].
    pub const fn with_max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index;
        self
    }

    /// Sets [`DecodeOptions::max_elements`].
    pub const fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
