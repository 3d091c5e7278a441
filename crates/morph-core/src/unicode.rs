//! Unicode helpers shared by the dictionary decoder and the analyzer.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Canonical letter case of a dictionary's keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    #[default]
    Lower,
    Upper,
}

impl CaseMode {
    pub fn apply(self, s: &str) -> String {
        match self {
            CaseMode::Lower => s.to_lowercase(),
            CaseMode::Upper => s.to_uppercase(),
        }
    }
}

/// Compose `s` to NFC, borrowing when it is already composed.
pub fn nfc(s: &str) -> Cow<'_, str> {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => Cow::Borrowed(s),
        _ => Cow::Owned(s.nfc().collect()),
    }
}

/// Reverse a string by chars (not bytes), so multi-byte letters survive.
pub fn reverse_chars(s: &str) -> String {
    s.chars().rev().collect()
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset where the last `n` chars of `s` begin, or `None` when `s` is
/// shorter than `n` chars.
pub fn tail_start(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(s.len());
    }
    s.char_indices().rev().nth(n - 1).map(|(i, _)| i)
}
