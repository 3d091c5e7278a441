//! Dictionary-declared input normalisation: canonical case plus a table of
//! orthographic substitutions, loaded from `normalize.toml`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::unicode::{nfc, CaseMode};

const SECTION: &str = "normalize";

/// On-disk shape of `normalize.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub case: CaseMode,
    #[serde(default)]
    pub substitutions: BTreeMap<String, String>,
}

impl NormalizeConfig {
    pub fn to_toml(&self) -> Result<String, FormatError> {
        toml::to_string(self).map_err(|e| FormatError::Malformed {
            section: SECTION,
            reason: e.to_string(),
        })
    }
}

/// Maps raw input to the key space of the word trie.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    case: CaseMode,
    substitutions: HashMap<char, String>,
}

impl Normalizer {
    pub fn from_toml(content: &str) -> Result<Self, FormatError> {
        let config: NormalizeConfig = toml::from_str(content).map_err(|e| FormatError::Malformed {
            section: SECTION,
            reason: e.to_string(),
        })?;
        Self::from_config(&config)
    }

    /// Substitution keys must be single characters. Keys and values are
    /// folded to the canonical case so either spelling may be declared.
    pub fn from_config(config: &NormalizeConfig) -> Result<Self, FormatError> {
        let mut substitutions = HashMap::with_capacity(config.substitutions.len());
        for (from, to) in &config.substitutions {
            let folded = config.case.apply(&nfc(from));
            let mut chars = folded.chars();
            let key = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(FormatError::Malformed {
                        section: SECTION,
                        reason: format!("substitution key {from:?} must be a single character"),
                    })
                }
            };
            substitutions.insert(key, config.case.apply(&nfc(to)));
        }
        Ok(Self {
            case: config.case,
            substitutions,
        })
    }

    pub fn case(&self) -> CaseMode {
        self.case
    }

    /// NFC, then case fold, then substitutions. The input is not modified.
    pub fn normalize(&self, word: &str) -> String {
        let folded = self.case.apply(&nfc(word));
        if self.substitutions.is_empty() {
            return folded;
        }
        let mut out = String::with_capacity(folded.len());
        for c in folded.chars() {
            match self.substitutions.get(&c) {
                Some(to) => out.push_str(to),
                None => out.push(c),
            }
        }
        nfc(&out).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lowercases() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("КОТ"), "кот");
    }

    #[test]
    fn test_substitutions_from_toml() {
        let n = Normalizer::from_toml(
            r#"
case = "lower"
[substitutions]
"ё" = "е"
"#,
        )
        .unwrap();
        assert_eq!(n.normalize("Ёжик"), "ежик");
        assert_eq!(n.normalize("ЁЖИК"), "ежик");
    }

    #[test]
    fn test_decomposed_input_is_composed_first() {
        let n = Normalizer::from_toml("[substitutions]\n\"ё\" = \"е\"\n").unwrap();
        assert_eq!(n.normalize("е\u{0308}ж"), "еж");
    }

    #[test]
    fn test_upper_case_mode() {
        let n = Normalizer::from_toml("case = \"upper\"\n").unwrap();
        assert_eq!(n.case(), CaseMode::Upper);
        assert_eq!(n.normalize("кот"), "КОТ");
    }

    #[test]
    fn test_reject_multi_char_key() {
        let err = Normalizer::from_toml("[substitutions]\n\"ab\" = \"c\"\n").unwrap_err();
        assert!(matches!(err, FormatError::Malformed { .. }));
    }

    #[test]
    fn test_reject_bad_case() {
        assert!(Normalizer::from_toml("case = \"title\"\n").is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = NormalizeConfig::default();
        config.substitutions.insert("ё".into(), "е".into());
        let text = config.to_toml().unwrap();
        let parsed: NormalizeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
