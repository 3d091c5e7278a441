use std::collections::HashMap;

use crate::error::{FormatError, IndexError};
use crate::format;

pub const MAGIC: &[u8; 4] = b"MTAG";
pub const VERSION: u16 = 1;

/// Id of the reserved "unknown" tag.
pub const UNKNOWN_TAG_ID: u16 = 0;
/// Conventional string for [`UNKNOWN_TAG_ID`].
pub const UNKNOWN_TAG: &str = "UNKN";

const SECTION: &str = "tags";

/// Dense `u16` id ↔ tag string mapping.
#[derive(Debug, Clone)]
pub struct TagTable {
    tags: Vec<String>,
    ids: HashMap<String, u16>,
}

impl TagTable {
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let (count, mut r) = format::parse_header(data, SECTION, MAGIC, VERSION)?;
        if count == 0 {
            return Err(r.malformed("tag table is empty; id 0 must be the unknown tag"));
        }
        if count > u16::MAX as u32 + 1 {
            return Err(r.malformed(format!("{count} tags exceed the u16 id space")));
        }
        let mut tags = Vec::with_capacity(count as usize);
        let mut ids = HashMap::with_capacity(count as usize);
        for id in 0..count {
            let len = r.u16()? as usize;
            let tag = r.str(len)?.to_string();
            if ids.insert(tag.clone(), id as u16).is_some() {
                return Err(r.malformed(format!("duplicate tag {tag:?} at id {id}")));
            }
            tags.push(tag);
        }
        r.finish()?;
        Ok(Self { tags, ids })
    }

    pub fn to_bytes(tags: &[String]) -> Result<Vec<u8>, FormatError> {
        let mut buf = Vec::new();
        format::write_header(&mut buf, MAGIC, VERSION, tags.len() as u32);
        for tag in tags {
            let len = u16::try_from(tag.len()).map_err(|_| FormatError::Malformed {
                section: SECTION,
                reason: format!("tag {tag:?} longer than {} bytes", u16::MAX),
            })?;
            buf.extend_from_slice(&len.to_le_bytes());
            buf.extend_from_slice(tag.as_bytes());
        }
        Ok(buf)
    }

    pub fn get(&self, tag_id: u16) -> Result<&str, IndexError> {
        self.tags
            .get(tag_id as usize)
            .map(String::as_str)
            .ok_or(IndexError::UnknownTag(tag_id))
    }

    pub fn id(&self, tag: &str) -> Option<u16> {
        self.ids.get(tag).copied()
    }

    pub fn contains(&self, tag_id: u16) -> bool {
        (tag_id as usize) < self.tags.len()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
