//! Word analysis: normalise, look up, predict on a miss, dedup and rank.
//!
//! `Analyzer` is immutable after construction apart from its optional
//! result cache, so one instance can be shared across threads.

mod cache;
pub mod predict;
pub mod rank;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use crate::dict::{DictionaryBundle, DictionaryStore, EntryRef, Lookup};
use crate::error::{DictError, IndexError};
use crate::settings::{self, Settings};

use cache::ParseCache;

/// Dictionary parses whose probabilities sum below this are scored
/// uniformly instead.
pub const MIN_PROBABILITY_MASS: f32 = 1e-6;

/// Where a parse came from. Dictionary parses rank before predicted ones
/// at equal score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provenance {
    Dictionary,
    Predicted,
}

/// One grammatical analysis of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    /// The normalised word that was analysed.
    pub word: String,
    pub lemma: String,
    pub tag: String,
    pub tag_id: u16,
    /// Confidence in `[0, 1]`.
    pub score: f32,
    /// Paradigm and form index; `None` only for the unknown parse.
    pub form: Option<EntryRef>,
    pub stem: String,
    pub provenance: Provenance,
}

impl Parse {
    pub fn is_predicted(&self) -> bool {
        self.provenance == Provenance::Predicted
    }

    /// Grammemes of the tag: tokens separated by commas or whitespace.
    pub fn grammemes(&self) -> impl Iterator<Item = &str> {
        grammemes(&self.tag)
    }
}

fn grammemes(tag: &str) -> impl Iterator<Item = &str> {
    tag.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|g| !g.is_empty())
}

pub struct Analyzer {
    store: DictionaryStore,
    settings: Settings,
    cache: ParseCache,
}

impl Analyzer {
    /// Load the bundle directory at `dir` with default settings.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DictError> {
        let bundle = DictionaryBundle::open(dir.as_ref())?;
        Self::from_bundle(&bundle)
    }

    pub fn from_bundle(bundle: &DictionaryBundle) -> Result<Self, DictError> {
        Self::with_settings(bundle, Settings::default())
    }

    pub fn with_settings(bundle: &DictionaryBundle, settings: Settings) -> Result<Self, DictError> {
        let store = DictionaryStore::open(bundle)?;
        Self::from_store(store, settings)
    }

    pub fn from_store(store: DictionaryStore, settings: Settings) -> Result<Self, DictError> {
        settings::validate(&settings)?;
        debug!(
            words = store.word_count(),
            cache_capacity = settings.cache.capacity,
            "analyzer ready"
        );
        Ok(Self {
            cache: ParseCache::new(settings.cache.capacity),
            store,
            settings,
        })
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ranked parses of `word`. Never fails; unknown input yields a single
    /// predicted parse with the unknown tag.
    pub fn parse(&self, word: &str) -> Vec<Parse> {
        let _span = debug_span!("parse", word).entered();
        let normalized = self.store.normalizer().normalize(word);
        if let Some(hit) = self.cache.get(&normalized) {
            debug!(parses = hit.len(), "cache hit");
            return hit.to_vec();
        }

        let candidates = match self.store.lookup(&normalized) {
            Lookup::Hit(entries) => self.dictionary_parses(&normalized, &entries),
            Lookup::Miss => predict::predict(&self.store, &self.settings.predictor, &normalized),
        };
        let parses = rank::rank(rank::dedup(candidates));
        debug!(parses = parses.len(), "parsed");

        self.cache.put(normalized, Arc::from(parses.as_slice()));
        parses
    }

    /// Distinct lemmas of `word`, best-ranked first.
    pub fn lemmatize(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in self.parse(word) {
            if !out.contains(&p.lemma) {
                out.push(p.lemma);
            }
        }
        out
    }

    /// Same as [`Analyzer::lemmatize`].
    pub fn normal_forms(&self, word: &str) -> Vec<String> {
        self.lemmatize(word)
    }

    /// Distinct tag strings of `word`, best-ranked first.
    pub fn tags(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in self.parse(word) {
            if !out.contains(&p.tag) {
                out.push(p.tag);
            }
        }
        out
    }

    /// Every form of the parse's lexeme, in form-index order. The unknown
    /// parse has no paradigm and its lexeme is the parse itself.
    pub fn lexeme(&self, parse: &Parse) -> Vec<Parse> {
        let Some(form) = parse.form else {
            return vec![parse.clone()];
        };
        let forms = match self.store.paradigms().lexeme(&parse.stem, form.paradigm_id) {
            Ok(forms) => forms,
            Err(err) => {
                warn!(%err, word = %parse.word, "lexeme of inconsistent parse");
                return vec![parse.clone()];
            }
        };
        forms
            .into_iter()
            .enumerate()
            .filter_map(|(i, (word, tag_id))| {
                let tag = self.store.tag_string(tag_id).ok()?;
                Some(Parse {
                    word,
                    lemma: parse.lemma.clone(),
                    tag: tag.to_string(),
                    tag_id,
                    score: parse.score,
                    form: Some(EntryRef::new(form.paradigm_id, i as u16)),
                    stem: parse.stem.clone(),
                    provenance: parse.provenance,
                })
            })
            .collect()
    }

    /// Forms of the parse's lexeme whose tag carries every grammeme in
    /// `required`.
    pub fn inflect(&self, parse: &Parse, required: &[&str]) -> Vec<Parse> {
        self.lexeme(parse)
            .into_iter()
            .filter(|p| {
                let have: Vec<&str> = p.grammemes().collect();
                required.iter().all(|g| have.contains(g))
            })
            .collect()
    }

    /// Number of words currently memoised.
    pub fn cached_words(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn dictionary_parses(&self, word: &str, entries: &[EntryRef]) -> Vec<Parse> {
        let mut parses: Vec<Parse> = entries
            .iter()
            .filter_map(|&entry| match self.dictionary_parse(word, entry) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(%err, word, "dropping dictionary candidate");
                    None
                }
            })
            .collect();
        self.score_dictionary(word, &mut parses);
        parses
    }

    fn dictionary_parse(&self, word: &str, entry: EntryRef) -> Result<Parse, IndexError> {
        let paradigms = self.store.paradigms();
        let stem = paradigms.strip(word, entry.paradigm_id, entry.form_index)?;
        let rule = paradigms.rule(entry.paradigm_id, entry.form_index)?;
        Ok(Parse {
            word: word.to_string(),
            lemma: paradigms.normal_form(stem, entry.paradigm_id)?,
            tag: self.store.tag_string(rule.tag_id)?.to_string(),
            tag_id: rule.tag_id,
            score: 0.0,
            form: Some(entry),
            stem: stem.to_string(),
            provenance: Provenance::Dictionary,
        })
    }

    /// P(tag | word) when the dictionary has it, `1/n` otherwise.
    fn score_dictionary(&self, word: &str, parses: &mut [Parse]) {
        if parses.is_empty() {
            return;
        }
        if self.store.has_frequencies() {
            let probs: Vec<f32> = parses
                .iter()
                .map(|p| self.store.frequency(word, p.tag_id).unwrap_or(0.0))
                .collect();
            if probs.iter().sum::<f32>() >= MIN_PROBABILITY_MASS {
                for (p, prob) in parses.iter_mut().zip(probs) {
                    p.score = prob.clamp(0.0, 1.0);
                }
                return;
            }
        }
        let uniform = 1.0 / parses.len() as f32;
        for p in parses.iter_mut() {
            p.score = uniform;
        }
    }
}
