use tracing::{debug, debug_span};

use super::bundle::DictionaryBundle;
use super::entry::{EntryRef, Lookup};
use super::frequency::FrequencyTable;
use super::meta::DictionaryMeta;
use super::normalize::Normalizer;
use super::suffix::{LengthClass, SuffixCounter, SuffixIndex, SuffixStat};
use super::tags::TagTable;
use crate::error::{FormatError, IndexError};
use crate::paradigm::{Paradigm, ParadigmTable};
use crate::trie::Trie;

/// Every table of one dictionary, decoded and cross-checked.
///
/// Construction validates all references eagerly, so the accessors below
/// only fail on ids that did not come from this store.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    words: Trie,
    word_count: usize,
    paradigms: ParadigmTable,
    tags: TagTable,
    suffixes: SuffixIndex,
    frequencies: Option<FrequencyTable>,
    normalizer: Normalizer,
    meta: DictionaryMeta,
}

impl DictionaryStore {
    pub fn open(bundle: &DictionaryBundle) -> Result<Self, FormatError> {
        let _span = debug_span!("store_open").entered();

        let meta = DictionaryMeta::from_json(&bundle.meta)?;
        meta.verify_checksums(|name| bundle.file(name))?;

        let tags = TagTable::from_bytes(&bundle.tags)?;
        let paradigms = ParadigmTable::from_bytes(&bundle.paradigms)?;
        for (_, paradigm) in paradigms.iter() {
            if let Some(rule) = paradigm.rules().iter().find(|r| !tags.contains(r.tag_id)) {
                return Err(IndexError::UnknownTag(rule.tag_id).into());
            }
        }

        let normalizer = match bundle.normalize.as_deref() {
            Some(data) => {
                let text = std::str::from_utf8(data).map_err(|e| FormatError::Malformed {
                    section: "normalize",
                    reason: e.to_string(),
                })?;
                Normalizer::from_toml(text)?
            }
            None => Normalizer::default(),
        };

        let words = Trie::from_bytes(&bundle.words)?;
        let mut counter = bundle.suffixes.is_none().then(SuffixCounter::default);
        let word_count = validate_words(&words, &paradigms, &normalizer, counter.as_mut())?;

        let suffixes = match (bundle.suffixes.as_deref(), counter) {
            (Some(data), _) => {
                let trie = Trie::from_bytes(data)?;
                SuffixIndex::validate_trie(&trie, |ending, paradigm_id, form_index| {
                    let rule = paradigms.rule(paradigm_id, form_index)?;
                    if rule.suffix != ending {
                        return Err(IndexError::AffixMismatch {
                            word: ending.to_string(),
                            paradigm_id,
                            form_index,
                        });
                    }
                    Ok(())
                })?;
                SuffixIndex::Trie(trie)
            }
            (None, Some(counter)) => SuffixIndex::Table(counter.finish()),
            (None, None) => SuffixIndex::Table(Default::default()),
        };

        let frequencies = match bundle.frequencies.as_deref() {
            Some(data) => Some(FrequencyTable::new(Trie::from_bytes(data)?, |id| {
                tags.contains(id)
            })?),
            None => None,
        };

        debug!(
            words = word_count,
            paradigms = paradigms.len(),
            tags = tags.len(),
            suffix_trie = matches!(suffixes, SuffixIndex::Trie(_)),
            frequencies = frequencies.is_some(),
            language = %meta.language_code,
            "dictionary store loaded"
        );

        Ok(Self {
            words,
            word_count,
            paradigms,
            tags,
            suffixes,
            frequencies,
            normalizer,
            meta,
        })
    }

    /// Exact lookup of an already normalised word.
    pub fn lookup(&self, normalized_word: &str) -> Lookup {
        match self.words.lookup(normalized_word.as_bytes()) {
            Some(payloads) => Lookup::Hit(payloads.iter().copied().map(EntryRef::unpack).collect()),
            None => Lookup::Miss,
        }
    }

    /// Homonym entries stored under `normalized_word`; empty on a miss.
    pub fn entries_for(&self, normalized_word: &str) -> Vec<EntryRef> {
        match self.lookup(normalized_word) {
            Lookup::Hit(entries) => entries,
            Lookup::Miss => Vec::new(),
        }
    }

    pub fn paradigm(&self, paradigm_id: u16) -> Result<&Paradigm, IndexError> {
        self.paradigms.get(paradigm_id)
    }

    pub fn paradigms(&self) -> &ParadigmTable {
        &self.paradigms
    }

    pub fn tag_string(&self, tag_id: u16) -> Result<&str, IndexError> {
        self.tags.get(tag_id)
    }

    pub fn tag_id(&self, tag: &str) -> Option<u16> {
        self.tags.id(tag)
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Ranked statistics for `ending` among words of `class`.
    pub fn suffix_stats(&self, ending: &str, class: LengthClass) -> Vec<SuffixStat> {
        self.suffixes.stats(ending, class)
    }

    /// P(tag | word), or `None` without a frequency table or a record.
    pub fn frequency(&self, normalized_word: &str, tag_id: u16) -> Option<f32> {
        self.frequencies
            .as_ref()?
            .probability(normalized_word, tag_id)
    }

    pub fn has_frequencies(&self) -> bool {
        self.frequencies.is_some()
    }

    pub fn meta(&self) -> &DictionaryMeta {
        &self.meta
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Number of distinct word keys.
    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

/// Check every word-trie key is reachable through `normalizer` and strips
/// cleanly under its paradigm form, and feed the suffix counter when one is
/// given. Returns the key count.
fn validate_words(
    words: &Trie,
    paradigms: &ParadigmTable,
    normalizer: &Normalizer,
    mut counter: Option<&mut SuffixCounter>,
) -> Result<usize, FormatError> {
    let mut count = 0;
    for (key, payloads) in words.iter() {
        let word = std::str::from_utf8(&key).map_err(|e| FormatError::Malformed {
            section: "words",
            reason: format!("key is not UTF-8: {e}"),
        })?;
        let normalized = normalizer.normalize(word);
        if normalized != word {
            return Err(FormatError::Malformed {
                section: "words",
                reason: format!("key {word:?} is not normalised (expected {normalized:?})"),
            });
        }
        for entry in payloads.iter().copied().map(EntryRef::unpack) {
            paradigms.strip(word, entry.paradigm_id, entry.form_index)?;
            if let Some(counter) = counter.as_deref_mut() {
                let rule = paradigms.rule(entry.paradigm_id, entry.form_index)?;
                counter.add(word, &rule.suffix, entry.paradigm_id, entry.form_index);
            }
        }
        count += 1;
    }
    Ok(count)
}
