//! Ending statistics used to predict paradigms of unknown words.
//!
//! Statistics come either from an optional suffix trie shipped with the
//! bundle or, when absent, are aggregated from the word trie at load.

use std::collections::HashMap;

use crate::error::{FormatError, IndexError};
use crate::trie::{Trie, TrieBuilder};
use crate::unicode::{char_len, reverse_chars};

const SECTION: &str = "suffixes";

/// Separates the reversed ending from the record bytes in suffix-trie keys.
const SEPARATOR: u8 = 0x01;
/// Record bytes after the separator: class u8, paradigm u16 BE, form u16 BE.
const RECORD_LEN: usize = 1 + 2 + 2;

/// Word-length bucket a statistic applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LengthClass {
    /// Up to 4 chars.
    Short,
    /// 5 to 7 chars.
    Medium,
    /// 8 chars or more.
    Long,
    /// Aggregate over every length.
    Any,
}

impl LengthClass {
    pub const CONCRETE: [LengthClass; 3] = [LengthClass::Short, LengthClass::Medium, LengthClass::Long];

    /// Bucket for a word of `chars` characters.
    pub fn of(chars: usize) -> Self {
        match chars {
            0..=4 => LengthClass::Short,
            5..=7 => LengthClass::Medium,
            _ => LengthClass::Long,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            LengthClass::Short => 0,
            LengthClass::Medium => 1,
            LengthClass::Long => 2,
            LengthClass::Any => 0xFF,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(LengthClass::Short),
            1 => Some(LengthClass::Medium),
            2 => Some(LengthClass::Long),
            0xFF => Some(LengthClass::Any),
            _ => None,
        }
    }
}

/// How often form `form_index` of paradigm `paradigm_id` was seen with a
/// given ending and length class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuffixStat {
    pub paradigm_id: u16,
    pub form_index: u16,
    pub count: u32,
    /// `count` divided by the total count of the `(ending, class)` list.
    pub frequency: f32,
}

/// Sort by descending count, then ascending ids, and fill in frequencies.
fn rank(stats: &mut [SuffixStat]) {
    let total: u64 = stats.iter().map(|s| s.count as u64).sum();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.paradigm_id.cmp(&b.paradigm_id))
            .then(a.form_index.cmp(&b.form_index))
    });
    for s in stats.iter_mut() {
        s.frequency = if total == 0 {
            0.0
        } else {
            (s.count as f64 / total as f64) as f32
        };
    }
}

/// Counts `(ending, class, paradigm, form)` occurrences.
#[derive(Debug, Default)]
pub(crate) struct SuffixCounter {
    counts: HashMap<(String, LengthClass), HashMap<(u16, u16), u32>>,
}

impl SuffixCounter {
    /// Record one dictionary word whose form carries `suffix`. Empty
    /// suffixes carry no evidence and are ignored.
    pub fn add(&mut self, word: &str, suffix: &str, paradigm_id: u16, form_index: u16) {
        if suffix.is_empty() {
            return;
        }
        let class = LengthClass::of(char_len(word));
        for c in [class, LengthClass::Any] {
            let slot = self
                .counts
                .entry((suffix.to_string(), c))
                .or_default()
                .entry((paradigm_id, form_index))
                .or_default();
            *slot = slot.saturating_add(1);
        }
    }

    pub fn finish(self) -> HashMap<(String, LengthClass), Vec<SuffixStat>> {
        self.counts
            .into_iter()
            .map(|(key, forms)| {
                let mut stats: Vec<SuffixStat> = forms
                    .into_iter()
                    .map(|((paradigm_id, form_index), count)| SuffixStat {
                        paradigm_id,
                        form_index,
                        count,
                        frequency: 0.0,
                    })
                    .collect();
                rank(&mut stats);
                (key, stats)
            })
            .collect()
    }

    /// Encode the counts as a suffix trie, keeping endings of at most
    /// `max_len` chars.
    pub fn to_trie(self, max_len: usize) -> TrieBuilder {
        let mut entries: Vec<(Vec<u8>, u32)> = Vec::new();
        for ((ending, class), forms) in self.counts {
            if char_len(&ending) > max_len {
                continue;
            }
            for ((paradigm_id, form_index), count) in forms {
                entries.push((record_key(&ending, class, paradigm_id, form_index), count));
            }
        }
        entries.sort();
        let mut b = TrieBuilder::new();
        for (key, count) in entries {
            b.insert(&key, count);
        }
        b
    }
}

fn lookup_prefix(ending: &str, class: LengthClass) -> Vec<u8> {
    let mut key = reverse_chars(ending).into_bytes();
    key.push(SEPARATOR);
    key.push(class.to_byte());
    key
}

fn record_key(ending: &str, class: LengthClass, paradigm_id: u16, form_index: u16) -> Vec<u8> {
    let mut key = lookup_prefix(ending, class);
    key.extend_from_slice(&paradigm_id.to_be_bytes());
    key.extend_from_slice(&form_index.to_be_bytes());
    key
}

/// Source of [`SuffixStat`] lists.
#[derive(Debug, Clone)]
pub(crate) enum SuffixIndex {
    Trie(Trie),
    Table(HashMap<(String, LengthClass), Vec<SuffixStat>>),
}

impl SuffixIndex {
    pub fn stats(&self, ending: &str, class: LengthClass) -> Vec<SuffixStat> {
        match self {
            SuffixIndex::Table(table) => table
                .get(&(ending.to_string(), class))
                .cloned()
                .unwrap_or_default(),
            SuffixIndex::Trie(trie) => {
                let prefix = lookup_prefix(ending, class);
                let mut stats: Vec<SuffixStat> = trie
                    .iter_prefixed(&prefix)
                    .filter_map(|(key, payloads)| {
                        let ids = key.get(prefix.len()..)?;
                        let (paradigm_id, form_index) = decode_ids(ids)?;
                        Some(SuffixStat {
                            paradigm_id,
                            form_index,
                            count: payloads.iter().copied().fold(0u32, u32::saturating_add),
                            frequency: 0.0,
                        })
                    })
                    .collect();
                rank(&mut stats);
                stats
            }
        }
    }

    /// Check every suffix-trie record: key shape, length class, and that
    /// the referenced form exists and carries exactly the recorded ending.
    pub fn validate_trie(
        trie: &Trie,
        mut check: impl FnMut(&str, u16, u16) -> Result<(), IndexError>,
    ) -> Result<(), FormatError> {
        for (key, _) in trie.iter() {
            let split = key
                .iter()
                .position(|&b| b == SEPARATOR)
                .filter(|&at| key.len() - at - 1 == RECORD_LEN)
                .ok_or_else(|| malformed("suffix key without a well-formed record"))?;
            let reversed = std::str::from_utf8(&key[..split])
                .map_err(|_| malformed("suffix key ending is not UTF-8"))?;
            let record = &key[split + 1..];
            LengthClass::from_byte(record[0])
                .ok_or_else(|| malformed(&format!("unknown length class {:#04x}", record[0])))?;
            let (paradigm_id, form_index) =
                decode_ids(&record[1..]).ok_or_else(|| malformed("short suffix record"))?;
            check(&reverse_chars(reversed), paradigm_id, form_index)?;
        }
        Ok(())
    }
}

fn decode_ids(ids: &[u8]) -> Option<(u16, u16)> {
    match ids {
        [p0, p1, f0, f1] => Some((u16::from_be_bytes([*p0, *p1]), u16::from_be_bytes([*f0, *f1]))),
        _ => None,
    }
}

fn malformed(reason: &str) -> FormatError {
    FormatError::Malformed {
        section: SECTION,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> SuffixCounter {
        let mut c = SuffixCounter::default();
        // 7 words of paradigm 4, 3 of paradigm 2, all Long
        for _ in 0..7 {
            c.add("сваривши", "ившись", 4, 1);
        }
        for _ in 0..3 {
            c.add("сваривши", "ившись", 2, 5);
        }
        c.add("кота", "а", 0, 1);
        c.add("кота", "", 0, 0);
        c
    }

    #[test]
    fn test_length_class_buckets() {
        assert_eq!(LengthClass::of(0), LengthClass::Short);
        assert_eq!(LengthClass::of(4), LengthClass::Short);
        assert_eq!(LengthClass::of(5), LengthClass::Medium);
        assert_eq!(LengthClass::of(7), LengthClass::Medium);
        assert_eq!(LengthClass::of(8), LengthClass::Long);
        for c in LengthClass::CONCRETE.into_iter().chain([LengthClass::Any]) {
            assert_eq!(LengthClass::from_byte(c.to_byte()), Some(c));
        }
        assert_eq!(LengthClass::from_byte(3), None);
    }

    #[test]
    fn test_table_stats_ranked_with_frequency() {
        let index = SuffixIndex::Table(counter().finish());
        let stats = index.stats("ившись", LengthClass::Long);
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].paradigm_id, stats[0].count), (4, 7));
        assert!((stats[0].frequency - 0.7).abs() < 1e-6);
        assert!((stats[1].frequency - 0.3).abs() < 1e-6);
        assert_eq!(index.stats("ившись", LengthClass::Any), stats);
        assert!(index.stats("ившись", LengthClass::Short).is_empty());
    }

    #[test]
    fn test_empty_suffix_not_recorded() {
        let table = counter().finish();
        assert!(!table.keys().any(|(ending, _)| ending.is_empty()));
    }

    #[test]
    fn test_trie_and_table_agree() {
        let table = SuffixIndex::Table(counter().finish());
        let trie = Trie::from_bytes(&counter().to_trie(6).to_bytes()).unwrap();
        let trie = SuffixIndex::Trie(trie);
        for (ending, class) in [
            ("ившись", LengthClass::Long),
            ("ившись", LengthClass::Any),
            ("а", LengthClass::Short),
            ("а", LengthClass::Long),
            ("шись", LengthClass::Any),
        ] {
            assert_eq!(table.stats(ending, class), trie.stats(ending, class), "{ending}");
        }
    }

    #[test]
    fn test_to_trie_respects_max_len() {
        let trie = Trie::from_bytes(&counter().to_trie(3).to_bytes()).unwrap();
        let index = SuffixIndex::Trie(trie);
        assert!(index.stats("ившись", LengthClass::Any).is_empty());
        assert_eq!(index.stats("а", LengthClass::Any).len(), 1);
    }

    #[test]
    fn test_ties_broken_by_ids() {
        let mut c = SuffixCounter::default();
        c.add("xxxxa", "a", 9, 2);
        c.add("xxxxa", "a", 1, 3);
        c.add("xxxxa", "a", 1, 0);
        let stats = SuffixIndex::Table(c.finish()).stats("a", LengthClass::Any);
        let ids: Vec<_> = stats.iter().map(|s| (s.paradigm_id, s.form_index)).collect();
        assert_eq!(ids, vec![(1, 0), (1, 3), (9, 2)]);
    }

    #[test]
    fn test_validate_trie_rejects_bad_record() {
        let mut b = TrieBuilder::new();
        b.insert(&[b'a', SEPARATOR, 0, 0], 1);
        let trie = Trie::from_bytes(&b.to_bytes()).unwrap();
        let err = SuffixIndex::validate_trie(&trie, |_, _, _| Ok(())).unwrap_err();
        assert!(matches!(err, FormatError::Malformed { .. }));
    }

    #[test]
    fn test_validate_trie_passes_ending_to_check() {
        let trie = Trie::from_bytes(&counter().to_trie(6).to_bytes()).unwrap();
        let mut seen = Vec::new();
        SuffixIndex::validate_trie(&trie, |ending, p, f| {
            seen.push((ending.to_string(), p, f));
            Ok(())
        })
        .unwrap();
        assert!(seen.contains(&("ившись".to_string(), 4, 1)));
        assert!(seen.contains(&("а".to_string(), 0, 1)));
    }

    #[test]
    fn test_validate_trie_propagates_index_error() {
        let trie = Trie::from_bytes(&counter().to_trie(6).to_bytes()).unwrap();
        let err = SuffixIndex::validate_trie(&trie, |_, p, _| {
            if p == 4 {
                Err(IndexError::UnknownParadigm(p))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, FormatError::Index(IndexError::UnknownParadigm(4))));
    }
}
