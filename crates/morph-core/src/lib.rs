//! Dictionary-backed morphological analysis.
//!
//! A compiled dictionary bundle (word trie, paradigm table, tag table and
//! optional suffix/frequency tries) is loaded once into an immutable
//! [`DictionaryStore`]; an [`Analyzer`] over it turns surface words into
//! ranked [`Parse`] records, predicting from word endings when a word is
//! not in the dictionary.

pub mod analyzer;
pub mod dict;
pub mod error;
pub(crate) mod format;
pub mod paradigm;
pub mod settings;
#[cfg(test)]
pub(crate) mod testutil;
pub mod trace_init;
pub mod trie;
pub mod unicode;

pub use analyzer::{Analyzer, Parse, Provenance};
pub use dict::{BundleBuilder, DictionaryBundle, DictionaryStore, EntryRef};
pub use error::{DictError, FormatError, IndexError};
pub use settings::Settings;
