//! `meta.json`: provenance and compatibility information for a bundle.
//! Nothing in here influences parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Bundle format understood by this crate. Bundles must share the major
/// component.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryMeta {
    pub format_version: String,
    pub language_code: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_version: String,
    #[serde(default)]
    pub compiled_at: String,
    /// CRC-32 of bundle files by file name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checksums: BTreeMap<String, u32>,
}

impl DictionaryMeta {
    pub fn new(language_code: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            language_code: language_code.to_string(),
            source: String::new(),
            source_version: String::new(),
            compiled_at: String::new(),
            checksums: BTreeMap::new(),
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self, FormatError> {
        let meta: Self = serde_json::from_slice(data).map_err(|e| FormatError::Malformed {
            section: "meta",
            reason: e.to_string(),
        })?;
        meta.check_compatible()?;
        Ok(meta)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, FormatError> {
        serde_json::to_vec_pretty(self).map_err(|e| FormatError::Malformed {
            section: "meta",
            reason: e.to_string(),
        })
    }

    fn check_compatible(&self) -> Result<(), FormatError> {
        if major(&self.format_version) != major(FORMAT_VERSION) {
            return Err(FormatError::IncompatibleMeta {
                expected: FORMAT_VERSION.to_string(),
                found: self.format_version.clone(),
            });
        }
        Ok(())
    }

    /// Verify every recorded checksum. `file` returns the bytes of a bundle
    /// file by name, or `None` if the bundle does not have it.
    pub fn verify_checksums<'a>(
        &self,
        file: impl Fn(&str) -> Option<&'a [u8]>,
    ) -> Result<(), FormatError> {
        for (name, &expected) in &self.checksums {
            let data = file(name).ok_or_else(|| FormatError::Malformed {
                section: "meta",
                reason: format!("checksum recorded for missing file {name:?}"),
            })?;
            let actual = crc32fast::hash(data);
            if actual != expected {
                return Err(FormatError::Checksum {
                    file: name.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut meta = DictionaryMeta::new("ru");
        meta.source = "opencorpora".into();
        meta.checksums.insert("words.trie".into(), 0xDEAD_BEEF);
        let parsed = DictionaryMeta::from_json(&meta.to_json().unwrap()).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn test_minor_version_is_compatible() {
        let json = br#"{"format_version": "1.7", "language_code": "uk"}"#;
        let meta = DictionaryMeta::from_json(json).unwrap();
        assert_eq!(meta.language_code, "uk");
        assert!(meta.checksums.is_empty());
    }

    #[test]
    fn test_major_version_mismatch() {
        let json = br#"{"format_version": "2.0", "language_code": "ru"}"#;
        assert!(matches!(
            DictionaryMeta::from_json(json),
            Err(FormatError::IncompatibleMeta { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DictionaryMeta::from_json(b"{not json"),
            Err(FormatError::Malformed { .. })
        ));
    }

    #[test]
    fn test_verify_checksums() {
        let data = b"payload".to_vec();
        let mut meta = DictionaryMeta::new("ru");
        meta.checksums
            .insert("words.trie".into(), crc32fast::hash(&data));
        let lookup = |name: &str| (name == "words.trie").then_some(data.as_slice());
        assert!(meta.verify_checksums(lookup).is_ok());

        meta.checksums.insert("words.trie".into(), 1);
        assert!(matches!(
            meta.verify_checksums(lookup),
            Err(FormatError::Checksum { .. })
        ));

        meta.checksums.clear();
        meta.checksums.insert("gone.bin".into(), 1);
        assert!(matches!(
            meta.verify_checksums(lookup),
            Err(FormatError::Malformed { .. })
        ));
    }
}
