use std::collections::BTreeMap;

use formwork_core::{CollectionSlot, FieldKind, Slot};
use tracing::{debug, trace};

use crate::decode::Decoder;
use crate::keypath::{Addressing, KeyNode};
use crate::{DecodeError, DecodeErrorKind, PathSegment};

impl Decoder<'_> {
    /// Builds a collection from either repeated `field` keys (flat) or
    /// `field[i]` keys (indexed). Any bracket under the field selects
    /// indexed addressing.
    pub(crate) fn collection(
        &mut self,
        element: &FieldKind,
        target: &mut dyn CollectionSlot,
        node: &KeyNode<'_>,
    ) -> Result<(), DecodeError> {
        self.descend(|d| match node.addressing() {
            Err(token) => Err(d.error(DecodeErrorKind::Index {
                token: token.to_owned(),
            })),
            Ok(Addressing::Flat(values)) => d.flat(element, target, values),
            Ok(Addressing::Indexed(indices)) => {
                if !node.values().is_empty() {
                    debug!(
                        path = %d.path(),
                        ignored = node.values().len(),
                        "collection has both exact and indexed keys, using indexed keys"
                    );
                }
                d.indexed(element, target, indices)
            }
        })
    }

    /// One element per value. Only scalar and nullable elements can be
    /// built from a bare value.
    fn flat(
        &mut self,
        element: &FieldKind,
        target: &mut dyn CollectionSlot,
        values: &[&str],
    ) -> Result<(), DecodeError> {
        trace!(path = %self.path(), len = values.len(), "flat collection");
        self.reserve_elements(values.len())?;
        target.reset(values.len());
        for (index, raw) in values.iter().enumerate() {
            self.at(PathSegment::Index(index), |d| match (element, target.element(index)) {
                (FieldKind::Scalar(_), Some(Slot::Scalar(slot))) => d.scalar(slot, raw),
                (FieldKind::Nullable(_), Some(Slot::Nullable(slot))) => {
                    d.nullable(slot, raw);
                    Ok(())
                }
                (FieldKind::Composite(_) | FieldKind::Collection(_), Some(_)) => {
                    Err(d.error(DecodeErrorKind::FlatCompositeElement {
                        type_name: element.to_string(),
                    }))
                }
                (kind, _) => Err(d.error(DecodeErrorKind::UnknownFieldKind {
                    kind: kind.to_string(),
                })),
            })?;
        }
        Ok(())
    }

    /// `max + 1` default elements, then every observed index decoded from
    /// its own sub-tree. Unobserved indices keep the default. The elements
    /// count against the call's budget before anything is allocated.
    fn indexed(
        &mut self,
        element: &FieldKind,
        target: &mut dyn CollectionSlot,
        indices: &BTreeMap<usize, KeyNode<'_>>,
    ) -> Result<(), DecodeError> {
        let Some(&max) = indices.keys().next_back() else {
            target.reset(0);
            return Ok(());
        };
        let limit = self.options().max_index;
        let len = match max.checked_add(1) {
            Some(len) if max <= limit => len,
            _ => {
                return self.at(PathSegment::Index(max), |d| {
                    Err(d.error(DecodeErrorKind::IndexTooLarge { index: max, limit }))
                });
            }
        };

        trace!(path = %self.path(), len, observed = indices.len(), "indexed collection");
        self.reserve_elements(len)?;
        target.reset(len);
        for (&index, child) in indices {
            self.at(PathSegment::Index(index), |d| {
                d.decode_slot(element, target.element(index), child)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use formwork::{FormSchema, Nullable};

    use crate::{DecodeErrorKind, DecodeOptions, from_str, from_str_with};

    #[derive(FormSchema, Default, Debug, PartialEq)]
    #[allow(non_snake_case)]
    struct Tagged {
        Tags: Vec<String>,
        Scores: Vec<Nullable<u8>>,
    }

    #[test]
    fn flat_keeps_encounter_order() {
        formwork_testhelpers::setup();

        let tagged: Tagged = from_str("Tags=b&Scores=1&Tags=a&Scores=x&Tags=c").unwrap();
        assert_eq!(tagged.Tags, ["b", "a", "c"]);
        assert_eq!(tagged.Scores, [Nullable::new(1), Nullable::null()]);
    }

    #[test]
    fn absent_collection_is_empty() {
        formwork_testhelpers::setup();

        let tagged: Tagged = from_str("Other=1").unwrap();
        assert_eq!(tagged, Tagged::default());
    }

    #[test]
    fn indexed_fills_gaps_with_defaults() {
        formwork_testhelpers::setup();

        let tagged: Tagged = from_str("Tags[3]=d&Tags[1]=b&Scores[2]=7").unwrap();
        assert_eq!(tagged.Tags, ["", "b", "", "d"]);
        assert_eq!(
            tagged.Scores,
            [Nullable::null(), Nullable::null(), Nullable::new(7)]
        );
    }

    #[test]
    fn indexed_wins_over_exact_key() {
        formwork_testhelpers::setup();

        let tagged: Tagged = from_str("Tags=ignored&Tags[0]=kept").unwrap();
        assert_eq!(tagged.Tags, ["kept"]);
    }

    #[test]
    fn repeated_index_takes_first_value() {
        formwork_testhelpers::setup();

        let tagged: Tagged = from_str("Tags[0]=first&Tags[0]=second").unwrap();
        assert_eq!(tagged.Tags, ["first"]);
    }

    #[test]
    fn malformed_index() {
        formwork_testhelpers::setup();

        for (input, token) in [
            ("Tags[x]=a", "x"),
            ("Tags[0]=a&Tags[-1]=b", "-1"),
            ("Tags[=a", ""),
        ] {
            let err = from_str::<Tagged>(input).unwrap_err();
            assert_eq!(err.path().to_string(), "Tags", "{input}");
            assert_eq!(
                err.into_kind(),
                DecodeErrorKind::Index {
                    token: token.into()
                },
                "{input}"
            );
        }
    }

    #[test]
    fn index_limit() {
        formwork_testhelpers::setup();

        let options = DecodeOptions::new().with_max_index(10);
        let tagged: Tagged = from_str_with("Tags[10]=k", &options).unwrap();
        assert_eq!(tagged.Tags.len(), 11);

        let err = from_str_with::<Tagged>("Tags[11]=l", &options).unwrap_err();
        assert_eq!(err.path().to_string(), "Tags[11]");
        assert_eq!(
            err.into_kind(),
            DecodeErrorKind::IndexTooLarge {
                index: 11,
                limit: 10
            }
        );

        let huge = format!("Tags[{}]=x", usize::MAX);
        let err = from_str_with::<Tagged>(&huge, &options.with_max_index(usize::MAX)).unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::IndexTooLarge { .. }));
    }

    #[test]
    fn scalar_element_errors_carry_the_index() {
        formwork_testhelpers::setup();

        #[derive(FormSchema, Default, Debug)]
        #[allow(non_snake_case)]
        struct Numbers {
            Values: Vec<i32>,
        }

        let err = from_str::<Numbers>("Values=1&Values=two").unwrap_err();
        assert_eq!(err.to_string(), "Values[1]: cannot parse `two` as i32: invalid digit found in string");

        let err = from_str::<Numbers>("Values[4]=1&Values[2]=").unwrap_err();
        assert_eq!(err.path().to_string(), "Values[2]");
    }

    #[test]
    fn element_budget_spans_all_collections() {
        formwork_testhelpers::setup();

        #[derive(FormSchema, Default, Debug)]
        #[allow(non_snake_case)]
        struct Board {
            Grid: Vec<Vec<String>>,
        }

        let options = DecodeOptions::new().with_max_elements(10);
        // 2 rows, then 4 and 4 cells
        let board: Board = from_str_with("Grid[0][3]=a&Grid[1][3]=b", &options).unwrap();
        assert_eq!(board.Grid[1][3], "b");

        let err = from_str_with::<Board>("Grid[0][3]=a&Grid[1][3]=b&Grid[2][0]=c", &options)
            .unwrap_err();
        assert_eq!(err.path().to_string(), "Grid[1]");
        assert_eq!(
            err.into_kind(),
            DecodeErrorKind::TooManyElements { limit: 10 }
        );

        // flat values count too
        let err = from_str_with::<Tagged>(&"Tags=x&".repeat(11), &options).unwrap_err();
        assert_eq!(err.path().to_string(), "Tags");
        assert!(matches!(err.kind(), DecodeErrorKind::TooManyElements { limit: 10 }));
    }
}
