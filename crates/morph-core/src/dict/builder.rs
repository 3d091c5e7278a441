//! Reference encoder producing a `DictionaryBundle` from plain tables.
//!
//! Used for fixtures, round-trip tests and small hand-made dictionaries;
//! production bundles come from an offline compiler emitting the same
//! formats.

use std::collections::BTreeMap;

use super::bundle::{
    DictionaryBundle, FileData, FREQUENCIES_FILE, NORMALIZE_FILE, PARADIGMS_FILE, SUFFIXES_FILE,
    TAGS_FILE, WORDS_FILE,
};
use super::entry::EntryRef;
use super::frequency;
use super::meta::DictionaryMeta;
use super::normalize::{NormalizeConfig, Normalizer};
use super::suffix::SuffixCounter;
use super::tags::{TagTable, UNKNOWN_TAG};
use crate::error::FormatError;
use crate::paradigm::{Paradigm, ParadigmTable};
use crate::trie::TrieBuilder;

#[derive(Debug, Clone)]
pub struct BundleBuilder {
    tags: Vec<String>,
    paradigms: Vec<Paradigm>,
    lexemes: Vec<(String, u16)>,
    frequencies: Vec<(String, u16, f32)>,
    normalization: Option<NormalizeConfig>,
    meta: DictionaryMeta,
    suffix_trie: Option<usize>,
    checksums: bool,
}

impl BundleBuilder {
    /// Start a bundle whose tag 0 is the unknown tag.
    pub fn new(language_code: &str) -> Self {
        Self {
            tags: vec![UNKNOWN_TAG.to_string()],
            paradigms: Vec::new(),
            lexemes: Vec::new(),
            frequencies: Vec::new(),
            normalization: None,
            meta: DictionaryMeta::new(language_code),
            suffix_trie: None,
            checksums: false,
        }
    }

    /// Id of `tag`, registering it on first use.
    pub fn tag(&mut self, tag: &str) -> u16 {
        match self.tags.iter().position(|t| t == tag) {
            Some(id) => id as u16,
            None => {
                self.tags.push(tag.to_string());
                (self.tags.len() - 1) as u16
            }
        }
    }

    /// Register a paradigm and return its id.
    pub fn paradigm(&mut self, paradigm: Paradigm) -> u16 {
        self.paradigms.push(paradigm);
        (self.paradigms.len() - 1) as u16
    }

    /// Add every form of `stem` under `paradigm_id` to the word trie.
    pub fn lexeme(&mut self, stem: &str, paradigm_id: u16) -> &mut Self {
        self.lexemes.push((stem.to_string(), paradigm_id));
        self
    }

    /// Record P(tag | word).
    pub fn frequency(&mut self, word: &str, tag_id: u16, probability: f32) -> &mut Self {
        self.frequencies
            .push((word.to_string(), tag_id, probability));
        self
    }

    pub fn normalization(&mut self, config: NormalizeConfig) -> &mut Self {
        self.normalization = Some(config);
        self
    }

    pub fn meta(&mut self, meta: DictionaryMeta) -> &mut Self {
        self.meta = meta;
        self
    }

    /// Also emit `suffixes.trie` with endings of up to `max_len` chars.
    /// Without it the store aggregates statistics at load time.
    pub fn suffix_trie(&mut self, max_len: usize) -> &mut Self {
        self.suffix_trie = Some(max_len);
        self
    }

    /// Record CRC-32 checksums of every file in `meta.json`.
    pub fn with_checksums(&mut self) -> &mut Self {
        self.checksums = true;
        self
    }

    /// Encode the bundle. Stems and frequency words are folded through the
    /// bundle's normalisation first; a form that is still not normalised
    /// (an affix in the wrong case, or carrying a substituted letter) is an
    /// error, since no input could ever reach it.
    pub fn build(&self) -> Result<DictionaryBundle, FormatError> {
        let table = ParadigmTable::new(self.paradigms.clone());
        let normalizer = match &self.normalization {
            Some(config) => Normalizer::from_config(config)?,
            None => Normalizer::default(),
        };

        // word -> homonym entries, deduplicated, in insertion order
        let mut words: BTreeMap<String, Vec<EntryRef>> = BTreeMap::new();
        for (stem, paradigm_id) in &self.lexemes {
            let stem = normalizer.normalize(stem);
            for (form_index, (form, _)) in table.lexeme(&stem, *paradigm_id)?.into_iter().enumerate() {
                if normalizer.normalize(&form) != form {
                    return Err(FormatError::Malformed {
                        section: "words",
                        reason: format!(
                            "form {form_index} of paradigm {paradigm_id} yields unnormalised {form:?}"
                        ),
                    });
                }
                let entry = EntryRef::new(*paradigm_id, form_index as u16);
                let slot = words.entry(form).or_default();
                if !slot.contains(&entry) {
                    slot.push(entry);
                }
            }
        }

        let mut word_trie = TrieBuilder::new();
        let mut counter = SuffixCounter::default();
        for (word, entries) in &words {
            for entry in entries {
                word_trie.insert(word.as_bytes(), entry.pack());
                let rule = table.rule(entry.paradigm_id, entry.form_index)?;
                counter.add(word, &rule.suffix, entry.paradigm_id, entry.form_index);
            }
        }

        let mut bundle = DictionaryBundle {
            words: word_trie.to_bytes().into(),
            paradigms: table.to_bytes()?.into(),
            tags: TagTable::to_bytes(&self.tags)?.into(),
            meta: FileData::Owned(Vec::new()),
            suffixes: self
                .suffix_trie
                .map(|max_len| counter.to_trie(max_len).to_bytes().into()),
            frequencies: (!self.frequencies.is_empty()).then(|| {
                let folded: Vec<(String, u16, f32)> = self
                    .frequencies
                    .iter()
                    .map(|(word, tag_id, p)| (normalizer.normalize(word), *tag_id, *p))
                    .collect();
                frequency::encode(&folded).to_bytes().into()
            }),
            normalize: match &self.normalization {
                Some(config) => Some(config.to_toml()?.into_bytes().into()),
                None => None,
            },
        };

        let mut meta = self.meta.clone();
        if self.checksums {
            for name in [
                WORDS_FILE,
                PARADIGMS_FILE,
                TAGS_FILE,
                SUFFIXES_FILE,
                FREQUENCIES_FILE,
                NORMALIZE_FILE,
            ] {
                if let Some(data) = bundle.file(name) {
                    meta.checksums.insert(name.to_string(), crc32fast::hash(data));
                }
            }
        }
        bundle.meta = meta.to_json()?.into();
        Ok(bundle)
    }
}
