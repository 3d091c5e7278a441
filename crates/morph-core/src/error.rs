//! Error taxonomy for dictionary loading.
//!
//! `parse()` never returns an error; everything here surfaces from
//! `Analyzer::open` / `Analyzer::from_bundle` and the decoders below them.

use std::io;

use crate::settings::SettingsError;

/// A malformed or version-incompatible dictionary file.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("{section}: too short, expected at least {expected} bytes, got {actual}")]
    TooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{section}: invalid magic bytes {found:?} (expected {expected:?})")]
    InvalidMagic {
        section: &'static str,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("{section}: unsupported version {found} (expected {expected})")]
    UnsupportedVersion {
        section: &'static str,
        expected: u16,
        found: u16,
    },

    #[error("{section}: truncated at byte {offset}")]
    Truncated { section: &'static str, offset: usize },

    #[error("{section}: {count} trailing bytes after the last record")]
    TrailingBytes { section: &'static str, count: usize },

    #[error("{section}: {reason}")]
    Malformed {
        section: &'static str,
        reason: String,
    },

    #[error("{file}: checksum mismatch (expected {expected:08x}, got {actual:08x})")]
    Checksum {
        file: String,
        expected: u32,
        actual: u32,
    },

    #[error("incompatible dictionary format version {found} (expected {expected})")]
    IncompatibleMeta { expected: String, found: String },

    #[error("dangling reference: {0}")]
    Index(#[from] IndexError),
}

/// An internal invariant violation while applying a paradigm.
///
/// At load time this is wrapped into [`FormatError::Index`]; on the parse
/// path it causes the offending candidate to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("paradigm {0} does not exist")]
    UnknownParadigm(u16),

    #[error("tag {0} does not exist")]
    UnknownTag(u16),

    #[error("form index {form_index} out of range for paradigm {paradigm_id} ({rule_count} rules)")]
    FormIndex {
        paradigm_id: u16,
        form_index: u16,
        rule_count: usize,
    },

    #[error("word {word:?} does not carry the affixes of paradigm {paradigm_id} form {form_index}")]
    AffixMismatch {
        word: String,
        paradigm_id: u16,
        form_index: u16,
    },
}

/// Top-level load error: either the bytes could not be read or they were
/// not a valid dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl From<IndexError> for DictError {
    fn from(e: IndexError) -> Self {
        DictError::Format(FormatError::Index(e))
    }
}
