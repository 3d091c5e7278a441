//! Dictionary storage.
//!
//! `DictionaryStore` owns the decoded word trie, paradigm and tag tables,
//! suffix statistics and optional frequency table of one bundle.
//! `DictionaryBundle` is the raw file set it is loaded from, and
//! `BundleBuilder` writes one from plain tables.

mod builder;
mod bundle;
mod entry;
mod frequency;
mod meta;
mod normalize;
mod store;
mod suffix;
mod tags;

pub use builder::BundleBuilder;
pub use bundle::{
    DictionaryBundle, FileData, FREQUENCIES_FILE, META_FILE, NORMALIZE_FILE, PARADIGMS_FILE,
    SUFFIXES_FILE, TAGS_FILE, WORDS_FILE,
};
pub use entry::{EntryRef, Lookup};
pub use frequency::{FrequencyTable, PROBABILITY_SCALE};
pub use meta::{DictionaryMeta, FORMAT_VERSION};
pub use normalize::{NormalizeConfig, Normalizer};
pub use store::DictionaryStore;
pub use suffix::{LengthClass, SuffixStat};
pub use tags::{TagTable, UNKNOWN_TAG, UNKNOWN_TAG_ID};
