use crate::error::{FormatError, IndexError};
use crate::trie::{Trie, TrieBuilder};

const SEPARATOR: u8 = 0x01;

/// Probabilities are stored as integers scaled by this factor.
pub const PROBABILITY_SCALE: f32 = 1_000_000.0;

/// P(tag | word) estimates keyed by `word 0x01 tag_id(BE)`.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    trie: Trie,
}

impl FrequencyTable {
    /// Wrap a decoded trie, checking every key ends in a known tag id.
    pub fn new(trie: Trie, tag_exists: impl Fn(u16) -> bool) -> Result<Self, FormatError> {
        for (key, _) in trie.iter() {
            let tag_id = match key.len().checked_sub(3).map(|at| &key[at..]) {
                Some([SEPARATOR, hi, lo]) => u16::from_be_bytes([*hi, *lo]),
                _ => {
                    return Err(FormatError::Malformed {
                        section: "frequencies",
                        reason: format!("key {:?} lacks a tag record", String::from_utf8_lossy(&key)),
                    })
                }
            };
            if !tag_exists(tag_id) {
                return Err(IndexError::UnknownTag(tag_id).into());
            }
        }
        Ok(Self { trie })
    }

    /// Estimated probability of `tag_id` for `word`, if recorded.
    pub fn probability(&self, word: &str, tag_id: u16) -> Option<f32> {
        let payloads = self.trie.lookup(&key(word, tag_id))?;
        let scaled = payloads.first().copied()?;
        Some(scaled as f32 / PROBABILITY_SCALE)
    }
}

fn key(word: &str, tag_id: u16) -> Vec<u8> {
    let mut k = Vec::with_capacity(word.len() + 3);
    k.extend_from_slice(word.as_bytes());
    k.push(SEPARATOR);
    k.extend_from_slice(&tag_id.to_be_bytes());
    k
}

/// Encode `(word, tag_id, probability)` triples. Probabilities are clamped
/// to `[0, 1]`.
pub(crate) fn encode(entries: &[(String, u16, f32)]) -> TrieBuilder {
    let mut sorted: Vec<(Vec<u8>, u32)> = entries
        .iter()
        .map(|(word, tag_id, p)| {
            let scaled = (p.clamp(0.0, 1.0) * PROBABILITY_SCALE).round() as u32;
            (key(word, *tag_id), scaled)
        })
        .collect();
    sorted.sort();
    sorted.dedup_by(|a, b| a.0 == b.0);
    let mut b = TrieBuilder::new();
    for (k, v) in sorted {
        b.insert(&k, v);
    }
    b
}
