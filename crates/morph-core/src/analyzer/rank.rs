use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, debug_span};

use super::Parse;

/// Total order of parses: descending score, dictionary before predicted,
/// then ascending paradigm id and form index (parses without a form last),
/// then lemma and tag so that the order never depends on input order.
pub fn compare(a: &Parse, b: &Parse) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.provenance.cmp(&b.provenance))
        .then(a.form.is_none().cmp(&b.form.is_none()))
        .then(a.form.cmp(&b.form))
        .then_with(|| a.lemma.cmp(&b.lemma))
        .then_with(|| a.tag.cmp(&b.tag))
}

/// Stable sort by [`compare`].
pub fn rank(mut parses: Vec<Parse>) -> Vec<Parse> {
    parses.sort_by(compare);
    parses
}

/// Collapse parses sharing `(lemma, tag)`, keeping the one that ranks
/// first (so the highest score survives).
pub fn dedup(parses: Vec<Parse>) -> Vec<Parse> {
    let _span = debug_span!("dedup", parses_in = parses.len()).entered();
    let before = parses.len();
    let mut best: HashMap<(String, String), Parse> = HashMap::with_capacity(before);
    for p in parses {
        let key = (p.lemma.clone(), p.tag.clone());
        match best.get_mut(&key) {
            Some(kept) if compare(&p, kept) == Ordering::Less => *kept = p,
            Some(_) => {}
            None => {
                best.insert(key, p);
            }
        }
    }
    if best.len() < before {
        debug!(removed = before - best.len(), "duplicate parses collapsed");
    }
    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Provenance;
    use crate::dict::EntryRef;

    fn parse(lemma: &str, tag: &str, score: f32, provenance: Provenance, form: Option<(u16, u16)>) -> Parse {
        Parse {
            word: "w".into(),
            lemma: lemma.into(),
            tag: tag.into(),
            tag_id: 1,
            score,
            form: form.map(|(p, f)| EntryRef::new(p, f)),
            stem: String::new(),
            provenance,
        }
    }

    #[test]
    fn test_rank_by_score_then_provenance_then_ids() {
        let ranked = rank(vec![
            parse("a", "T", 0.2, Provenance::Dictionary, Some((0, 0))),
            parse("b", "T", 0.5, Provenance::Predicted, Some((1, 0))),
            parse("c", "T", 0.5, Provenance::Dictionary, Some((9, 0))),
            parse("d", "T", 0.5, Provenance::Predicted, Some((0, 3))),
            parse("e", "T", 0.5, Provenance::Predicted, Some((0, 1))),
        ]);
        let lemmas: Vec<&str> = ranked.iter().map(|p| p.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["c", "e", "d", "b", "a"]);
    }

    #[test]
    fn test_parse_without_form_ranks_after_ids() {
        let ranked = rank(vec![
            parse("x", "UNKN", 0.0, Provenance::Predicted, None),
            parse("y", "T", 0.0, Provenance::Predicted, Some((5, 5))),
        ]);
        assert_eq!(ranked[0].lemma, "y");
    }

    #[test]
    fn test_dedup_keeps_highest_score() {
        let out = rank(dedup(vec![
            parse("кот", "NOUN", 0.25, Provenance::Dictionary, Some((3, 0))),
            parse("кот", "NOUN", 0.75, Provenance::Dictionary, Some((7, 0))),
            parse("кот", "VERB", 0.1, Provenance::Dictionary, Some((8, 0))),
        ]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].form, Some(EntryRef::new(7, 0)));
        assert!((out[0].score - 0.75).abs() < f32::EPSILON);
        assert_eq!(out[1].tag, "VERB");
    }

    #[test]
    fn test_dedup_tie_prefers_dictionary() {
        let out = dedup(vec![
            parse("кот", "NOUN", 0.5, Provenance::Predicted, Some((0, 0))),
            parse("кот", "NOUN", 0.5, Provenance::Dictionary, Some((4, 0))),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].provenance, Provenance::Dictionary);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_parse() -> impl Strategy<Value = Parse> {
            (
                "[ab]{1,2}",
                "[XY]",
                0u8..=4,
                any::<bool>(),
                proptest::option::of((0u16..3, 0u16..3)),
            )
                .prop_map(|(lemma, tag, score, predicted, form)| {
                    let provenance = if predicted {
                        Provenance::Predicted
                    } else {
                        Provenance::Dictionary
                    };
                    parse(&lemma, &tag, score as f32 / 4.0, provenance, form)
                })
        }

        proptest! {
            #[test]
            fn ranked_scores_non_increasing(parses in prop::collection::vec(arb_parse(), 0..20)) {
                let ranked = rank(dedup(parses));
                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].score >= pair[1].score);
                    if pair[0].score == pair[1].score {
                        prop_assert!(pair[0].provenance <= pair[1].provenance);
                    }
                }
            }

            #[test]
            fn rank_ignores_input_order(parses in prop::collection::vec(arb_parse(), 0..20)) {
                let mut reversed = parses.clone();
                reversed.reverse();
                prop_assert_eq!(rank(dedup(parses)), rank(dedup(reversed)));
            }

            #[test]
            fn dedup_leaves_unique_keys(parses in prop::collection::vec(arb_parse(), 0..20)) {
                let out = dedup(parses);
                let mut keys: Vec<(String, String)> =
                    out.iter().map(|p| (p.lemma.clone(), p.tag.clone())).collect();
                keys.sort();
                keys.dedup();
                prop_assert_eq!(keys.len(), out.len());
            }
        }
    }
}
