//! Out-of-vocabulary prediction from ending statistics.

use tracing::{debug, debug_span, warn};

use super::{Parse, Provenance};
use crate::dict::{DictionaryStore, EntryRef, LengthClass, SuffixStat, UNKNOWN_TAG, UNKNOWN_TAG_ID};
use crate::error::IndexError;
use crate::settings::PredictorSettings;
use crate::unicode::{char_len, tail_start};

/// Predict parses of a normalised word absent from the dictionary.
///
/// Endings are tried longest first, from `max_suffix_length` down to one
/// char, always leaving at least one char of stem. At each length the
/// word's own length class is queried before `Any`; the first list found
/// decides the result. Without any statistics (or for words shorter than
/// `min_word_length`) the single unknown parse is returned.
pub fn predict(store: &DictionaryStore, settings: &PredictorSettings, word: &str) -> Vec<Parse> {
    let chars = char_len(word);
    let _span = debug_span!("predict", word, chars).entered();

    if chars >= settings.min_word_length {
        let class = LengthClass::of(chars);
        let longest = settings.max_suffix_length.min(chars.saturating_sub(1));
        for len in (1..=longest).rev() {
            let Some(split) = tail_start(word, len) else {
                continue;
            };
            let (head, ending) = word.split_at(split);
            for c in [class, LengthClass::Any] {
                let stats = store.suffix_stats(ending, c);
                if stats.is_empty() {
                    continue;
                }
                let parses = candidates(store, settings, word, head, ending, &stats);
                debug!(
                    ending,
                    class = ?c,
                    stats = stats.len(),
                    candidates = parses.len(),
                    "ending matched"
                );
                if parses.is_empty() {
                    return vec![unknown(store, word)];
                }
                return parses;
            }
        }
    }
    vec![unknown(store, word)]
}

fn candidates(
    store: &DictionaryStore,
    settings: &PredictorSettings,
    word: &str,
    head: &str,
    ending: &str,
    stats: &[SuffixStat],
) -> Vec<Parse> {
    let mut out = Vec::with_capacity(stats.len().min(settings.max_candidates));
    for stat in stats {
        if out.len() == settings.max_candidates {
            break;
        }
        match candidate(store, settings, word, head, ending, stat) {
            Ok(Some(p)) => out.push(p),
            Ok(None) => {}
            Err(err) => warn!(%err, word, ending, "dropping predicted candidate"),
        }
    }
    out
}

/// One predicted parse, `None` when the paradigm has no form carrying
/// `ending` with a prefix the word starts with.
fn candidate(
    store: &DictionaryStore,
    settings: &PredictorSettings,
    word: &str,
    head: &str,
    ending: &str,
    stat: &SuffixStat,
) -> Result<Option<Parse>, IndexError> {
    let paradigm = store.paradigm(stat.paradigm_id)?;
    let form_index = match paradigm.rule(stat.form_index) {
        Some(rule) if rule.suffix == ending => Some(stat.form_index),
        _ => paradigm.forms_with_suffix(ending).next(),
    };
    let Some(form_index) = form_index else {
        return Ok(None);
    };
    let rule = store.paradigms().rule(stat.paradigm_id, form_index)?;
    let Some(stem) = head.strip_prefix(rule.prefix.as_str()) else {
        return Ok(None);
    };
    let lemma = store.paradigms().normal_form(stem, stat.paradigm_id)?;
    let tag = store.tag_string(rule.tag_id)?;
    Ok(Some(Parse {
        word: word.to_string(),
        lemma,
        tag: tag.to_string(),
        tag_id: rule.tag_id,
        score: (stat.frequency * settings.score_scale).clamp(0.0, 1.0),
        form: Some(EntryRef::new(stat.paradigm_id, form_index)),
        stem: stem.to_string(),
        provenance: Provenance::Predicted,
    }))
}

/// The reserved unknown parse: the word is its own lemma.
pub fn unknown(store: &DictionaryStore, word: &str) -> Parse {
    let tag = store.tag_string(UNKNOWN_TAG_ID).unwrap_or(UNKNOWN_TAG);
    Parse {
        word: word.to_string(),
        lemma: word.to_string(),
        tag: tag.to_string(),
        tag_id: UNKNOWN_TAG_ID,
        score: 0.0,
        form: None,
        stem: word.to_string(),
        provenance: Provenance::Predicted,
    }
}
