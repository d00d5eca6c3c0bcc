//! Key paths (`Items[2].Name`) and the trie built from all keys of a form.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{DecodeOptions, RawForm};

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A field name, from the start of the key or after `.`
    Name(&'a str),
    /// A bracketed, non-negative decimal index
    Index(usize),
    /// A bracket whose content is not a valid index (`[x]`, `[-1]`, or an
    /// unclosed `[`)
    BadIndex(&'a str),
}

/// A parsed form key.
///
/// ```text
/// path    := segment ("." segment)*
/// segment := name ("[" digits "]")*
/// ```
///
/// Parsing never fails: malformed brackets become [`Segment::BadIndex`],
/// and a name directly after `]` (`a[0]b`) reads like `a[0].b`. Nothing
/// after an unclosed `[` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> KeyPath<'a> {
    /// Splits `key` into segments.
    pub fn parse(key: &'a str) -> Self {
        let mut segments = Vec::new();
        let mut rest = key;
        loop {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            segments.push(Segment::Name(&rest[..end]));
            rest = &rest[end..];

            while let Some(open) = rest.strip_prefix('[') {
                let Some(close) = open.find(']') else {
                    segments.push(Segment::BadIndex(open));
                    return Self { segments };
                };
                segments.push(index_segment(&open[..close]));
                rest = &open[close + 1..];
            }

            if let Some(next) = rest.strip_prefix('.') {
                rest = next;
            } else if rest.is_empty() {
                return Self { segments };
            }
        }
    }

    /// The segments, in key order. Never empty.
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }
}

fn index_segment(token: &str) -> Segment<'_> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Segment::BadIndex(token);
    }
    // all digits, so the only failure left is overflow
    token.parse().map_or(Segment::BadIndex(token), Segment::Index)
}

/// How a collection field was addressed.
#[derive(Debug)]
pub(crate) enum Addressing<'n, 'a> {
    /// Repeated exact keys: one element per value
    Flat(&'n [&'a str]),
    /// `field[i]` keys, by index
    Indexed(&'n BTreeMap<usize, KeyNode<'a>>),
}

/// A node of the key-path trie.
///
/// The root holds every key of a [`RawForm`]; `child("Items")` holds what
/// was under `Items`, with that prefix consumed.
#[derive(Debug, Default)]
pub(crate) struct KeyNode<'a> {
    /// Values submitted under exactly this path
    values: Vec<&'a str>,
    children: BTreeMap<&'a str, KeyNode<'a>>,
    indices: BTreeMap<usize, KeyNode<'a>>,
    bad_indices: Vec<&'a str>,
}

static EMPTY: KeyNode<'static> = KeyNode::new();

impl<'a> KeyNode<'a> {
    const fn new() -> Self {
        Self {
            values: Vec::new(),
            children: BTreeMap::new(),
            indices: BTreeMap::new(),
            bad_indices: Vec::new(),
        }
    }

    /// A node with nothing under it.
    pub(crate) fn empty() -> &'static KeyNode<'static> {
        &EMPTY
    }

    /// Parses every key of `form` once and builds the trie.
    ///
    /// Each segment after the first one is read one nesting level deeper, so
    /// a key with more than `max_depth + 1` segments cannot reach any field
    /// and is skipped. This also bounds the depth of the trie itself.
    pub(crate) fn from_form(form: &'a RawForm, options: &DecodeOptions) -> Self {
        let max_segments = options.max_depth.saturating_add(1);
        let mut root = Self::new();
        for (key, values) in form.iter() {
            let path = KeyPath::parse(key);
            if path.segments().len() > max_segments {
                trace!(
                    key_len = key.len(),
                    segments = path.segments().len(),
                    max_segments,
                    "skipping key nested beyond the depth limit"
                );
                continue;
            }
            root.insert(&path, values);
        }
        root
    }

    fn insert(&mut self, path: &KeyPath<'a>, values: &'a [String]) {
        let mut node = self;
        for segment in path.segments() {
            node = match *segment {
                Segment::Name(name) => node.children.entry(name).or_default(),
                Segment::Index(index) => node.indices.entry(index).or_default(),
                Segment::BadIndex(token) => {
                    node.bad_indices.push(token);
                    return;
                }
            };
        }
        node.values.extend(values.iter().map(String::as_str));
    }

    /// The sub-tree under `name`, if any key went through it.
    pub(crate) fn child(&self, name: &str) -> Option<&KeyNode<'a>> {
        self.children.get(name)
    }

    /// All values submitted under exactly this path.
    pub(crate) fn values(&self) -> &[&'a str] {
        &self.values
    }

    /// The first value submitted under exactly this path.
    pub(crate) fn first_value(&self) -> Option<&'a str> {
        self.values.first().copied()
    }

    /// Returns true if any bracket, valid or not, follows this path.
    pub(crate) fn is_indexed(&self) -> bool {
        !self.indices.is_empty() || !self.bad_indices.is_empty()
    }

    /// Resolves collection addressing. Any bracket makes the collection
    /// indexed; a malformed one is returned as the error.
    pub(crate) fn addressing(&self) -> Result<Addressing<'_, 'a>, &'a str> {
        if let Some(&token) = self.bad_indices.first() {
            return Err(token);
        }
        if self.is_indexed() {
            Ok(Addressing::Indexed(&self.indices))
        } else {
            Ok(Addressing::Flat(&self.values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Segment::*;

    fn parse(key: &str) -> Vec<Segment<'_>> {
        KeyPath::parse(key).segments().to_vec()
    }

    #[test]
    fn dotted_and_bracketed() {
        formwork_testhelpers::setup();

        assert_eq!(parse("Username"), [Name("Username")]);
        assert_eq!(parse("Child.Name"), [Name("Child"), Name("Name")]);
        assert_eq!(parse("Tags[2]"), [Name("Tags"), Index(2)]);
        assert_eq!(
            parse("Items[3].Name"),
            [Name("Items"), Index(3), Name("Name")]
        );
        assert_eq!(parse("Grid[0][1]"), [Name("Grid"), Index(0), Index(1)]);
        assert_eq!(parse("Tags[007]"), [Name("Tags"), Index(7)]);
    }

    #[test]
    fn name_right_after_bracket() {
        formwork_testhelpers::setup();

        assert_eq!(parse("a[0]b"), parse("a[0].b"));
    }

    #[test]
    fn malformed_indices() {
        formwork_testhelpers::setup();

        assert_eq!(parse("Tags[x]"), [Name("Tags"), BadIndex("x")]);
        assert_eq!(parse("Tags[-1]"), [Name("Tags"), BadIndex("-1")]);
        assert_eq!(parse("Tags[]"), [Name("Tags"), BadIndex("")]);
        assert_eq!(parse("Tags[1.5]"), [Name("Tags"), BadIndex("1.5")]);
        assert_eq!(parse("Tags[3"), [Name("Tags"), BadIndex("3")]);
        assert_eq!(
            parse("Tags[99999999999999999999999]"),
            [Name("Tags"), BadIndex("99999999999999999999999")]
        );
    }

    #[test]
    fn degenerate_keys() {
        formwork_testhelpers::setup();

        assert_eq!(parse(""), [Name("")]);
        assert_eq!(parse("a..b"), [Name("a"), Name(""), Name("b")]);
        assert_eq!(parse("[0]"), [Name(""), Index(0)]);
    }

    #[test]
    fn trie_groups_by_prefix() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("Child.Name=x&Child.Tags[1]=b&Child.Tags[0]=a&Other=1&Other=2");
        let root = KeyNode::from_form(&form, &DecodeOptions::default());

        let child = root.child("Child").unwrap();
        assert_eq!(child.child("Name").unwrap().first_value(), Some("x"));
        assert!(child.child("Missing").is_none());

        let tags = child.child("Tags").unwrap();
        let Ok(Addressing::Indexed(indices)) = tags.addressing() else {
            panic!("Tags should be indexed");
        };
        let by_index: Vec<_> = indices
            .iter()
            .map(|(i, node)| (*i, node.first_value()))
            .collect();
        assert_eq!(by_index, [(0, Some("a")), (1, Some("b"))]);

        let other = root.child("Other").unwrap();
        let Ok(Addressing::Flat(values)) = other.addressing() else {
            panic!("Other should be flat");
        };
        assert_eq!(values, ["1", "2"]);
    }

    #[test]
    fn any_bad_bracket_is_an_error() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("Tags[0]=a&Tags[x]=b");
        let root = KeyNode::from_form(&form, &DecodeOptions::default());
        let tags = root.child("Tags").unwrap();
        assert!(tags.is_indexed());
        assert_eq!(tags.addressing().unwrap_err(), "x");
    }

    #[test]
    fn exact_key_next_to_brackets() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("Tags=flat&Tags[1]=b");
        let tags = KeyNode::from_form(&form, &DecodeOptions::default());
        let tags = tags.child("Tags").unwrap();
        assert_eq!(tags.values(), ["flat"]);
        assert!(matches!(tags.addressing(), Ok(Addressing::Indexed(_))));
    }

    #[test]
    fn keys_deeper_than_the_limit_are_skipped() {
        formwork_testhelpers::setup();

        let deep_name = format!("{}=1", "a.".repeat(300_000));
        let deep_index = format!("Tags{}=1", "[0]".repeat(200_000));
        let form = RawForm::parse(&format!("Username=x&{deep_name}&{deep_index}&Tags[0]=t"));
        let root = KeyNode::from_form(&form, &DecodeOptions::default());

        assert_eq!(root.child("Username").unwrap().first_value(), Some("x"));
        assert!(root.child("a").is_none());
        let tags = root.child("Tags").unwrap();
        let Ok(Addressing::Indexed(indices)) = tags.addressing() else {
            panic!("Tags should be indexed");
        };
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[&0].first_value(), Some("t"));
        assert!(indices[&0].indices.is_empty());
    }

    #[test]
    fn segment_limit_follows_max_depth() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("a.b.c=3&a.b=2");
        let options = DecodeOptions::new().with_max_depth(1);
        let root = KeyNode::from_form(&form, &options);
        let b = root.child("a").unwrap().child("b").unwrap();
        assert_eq!(b.first_value(), Some("2"));
        assert!(b.child("c").is_none());

        let root = KeyNode::from_form(&form, &DecodeOptions::new().with_max_depth(usize::MAX));
        let c = root.child("a").unwrap().child("b").unwrap().child("c").unwrap();
        assert_eq!(c.first_value(), Some("3"));
    }

    #[test]
    fn empty_node() {
        formwork_testhelpers::setup();

        let empty = KeyNode::empty();
        assert_eq!(empty.first_value(), None);
        assert!(matches!(empty.addressing(), Ok(Addressing::Flat([]))));
    }
}
