//! Paradigm table and the pure affix arithmetic applied to stems.
//!
//! A paradigm is an ordered list of rules `(prefix, suffix, tag_id)`. Form
//! `i` of a stem is `prefix[i] + stem + suffix[i]`, NFC-normalised. Each
//! paradigm designates one rule as its lemma form.

use crate::error::{FormatError, IndexError};
use crate::format;
use crate::unicode::nfc;

pub const MAGIC: &[u8; 4] = b"MPAR";
pub const VERSION: u16 = 1;

const SECTION: &str = "paradigms";

/// One inflection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub prefix: String,
    pub suffix: String,
    pub tag_id: u16,
}

impl Rule {
    pub fn new(prefix: &str, suffix: &str, tag_id: u16) -> Self {
        Self {
            prefix: nfc(prefix).into_owned(),
            suffix: nfc(suffix).into_owned(),
            tag_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paradigm {
    rules: Vec<Rule>,
    lemma_index: u16,
}

impl Paradigm {
    /// Build a paradigm. `rules` must be non-empty and `lemma_index` must
    /// address one of them; `ParadigmTable::from_bytes` enforces this.
    pub fn new(rules: Vec<Rule>, lemma_index: u16) -> Self {
        Self { rules, lemma_index }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn lemma_index(&self) -> u16 {
        self.lemma_index
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, form_index: u16) -> Option<&Rule> {
        self.rules.get(form_index as usize)
    }

    /// Form indices whose suffix is exactly `suffix`, ascending.
    pub fn forms_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = u16> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, r)| r.suffix == suffix)
            .map(|(i, _)| i as u16)
    }
}

/// All paradigms of a dictionary, addressed by dense `u16` ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParadigmTable {
    paradigms: Vec<Paradigm>,
}

impl ParadigmTable {
    pub fn new(paradigms: Vec<Paradigm>) -> Self {
        Self { paradigms }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let (count, mut r) = format::parse_header(data, SECTION, MAGIC, VERSION)?;
        if count > u16::MAX as u32 + 1 {
            return Err(r.malformed(format!("{count} paradigms exceed the u16 id space")));
        }
        let mut paradigms = Vec::with_capacity(count as usize);
        for id in 0..count {
            let rule_count = r.u16()?;
            let lemma_index = r.u16()?;
            if rule_count == 0 {
                return Err(r.malformed(format!("paradigm {id} has no rules")));
            }
            if lemma_index >= rule_count {
                return Err(r.malformed(format!(
                    "paradigm {id}: lemma index {lemma_index} >= rule count {rule_count}"
                )));
            }
            let mut rules = Vec::with_capacity(rule_count as usize);
            for _ in 0..rule_count {
                let prefix_len = r.u8()? as usize;
                let suffix_len = r.u8()? as usize;
                let prefix = r.str(prefix_len)?;
                let suffix = r.str(suffix_len)?;
                let tag_id = r.u16()?;
                rules.push(Rule::new(prefix, suffix, tag_id));
            }
            paradigms.push(Paradigm::new(rules, lemma_index));
        }
        r.finish()?;
        Ok(Self { paradigms })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let too_long = |what: &str, id: usize| FormatError::Malformed {
            section: SECTION,
            reason: format!("paradigm {id}: {what} longer than 255 bytes"),
        };
        let mut buf = Vec::new();
        format::write_header(&mut buf, MAGIC, VERSION, self.paradigms.len() as u32);
        for (id, p) in self.paradigms.iter().enumerate() {
            buf.extend_from_slice(&(p.rules.len() as u16).to_le_bytes());
            buf.extend_from_slice(&p.lemma_index.to_le_bytes());
            for rule in &p.rules {
                let prefix_len = u8::try_from(rule.prefix.len()).map_err(|_| too_long("prefix", id))?;
                let suffix_len = u8::try_from(rule.suffix.len()).map_err(|_| too_long("suffix", id))?;
                buf.push(prefix_len);
                buf.push(suffix_len);
                buf.extend_from_slice(rule.prefix.as_bytes());
                buf.extend_from_slice(rule.suffix.as_bytes());
                buf.extend_from_slice(&rule.tag_id.to_le_bytes());
            }
        }
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.paradigms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paradigms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Paradigm)> {
        self.paradigms.iter().enumerate().map(|(i, p)| (i as u16, p))
    }

    pub fn get(&self, paradigm_id: u16) -> Result<&Paradigm, IndexError> {
        self.paradigms
            .get(paradigm_id as usize)
            .ok_or(IndexError::UnknownParadigm(paradigm_id))
    }

    pub fn rule(&self, paradigm_id: u16, form_index: u16) -> Result<&Rule, IndexError> {
        let p = self.get(paradigm_id)?;
        p.rule(form_index).ok_or(IndexError::FormIndex {
            paradigm_id,
            form_index,
            rule_count: p.len(),
        })
    }

    /// Apply rule `form_index` of `paradigm_id` to `stem`.
    pub fn reconstruct(
        &self,
        stem: &str,
        paradigm_id: u16,
        form_index: u16,
    ) -> Result<(String, u16), IndexError> {
        let rule = self.rule(paradigm_id, form_index)?;
        Ok((apply(rule, stem), rule.tag_id))
    }

    /// The lemma of `stem` under `paradigm_id`.
    pub fn normal_form(&self, stem: &str, paradigm_id: u16) -> Result<String, IndexError> {
        let p = self.get(paradigm_id)?;
        self.reconstruct(stem, paradigm_id, p.lemma_index)
            .map(|(form, _)| form)
    }

    /// Inverse of `reconstruct`: remove the form's prefix and suffix from
    /// `word`, returning the stem.
    pub fn strip<'w>(
        &self,
        word: &'w str,
        paradigm_id: u16,
        form_index: u16,
    ) -> Result<&'w str, IndexError> {
        let rule = self.rule(paradigm_id, form_index)?;
        word.strip_prefix(rule.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(rule.suffix.as_str()))
            .ok_or_else(|| IndexError::AffixMismatch {
                word: word.to_string(),
                paradigm_id,
                form_index,
            })
    }

    /// Every form of `stem` under `paradigm_id`, in form-index order.
    pub fn lexeme(&self, stem: &str, paradigm_id: u16) -> Result<Vec<(String, u16)>, IndexError> {
        let p = self.get(paradigm_id)?;
        Ok(p.rules.iter().map(|rule| (apply(rule, stem), rule.tag_id)).collect())
    }
}

fn apply(rule: &Rule, stem: &str) -> String {
    let mut out = String::with_capacity(rule.prefix.len() + stem.len() + rule.suffix.len());
    out.push_str(&rule.prefix);
    out.push_str(stem);
    out.push_str(&rule.suffix);
    // Joining two NFC strings can leave a composable pair at the seam.
    match nfc(&out) {
        std::borrow::Cow::Borrowed(_) => out,
        std::borrow::Cow::Owned(composed) => composed,
    }
}
