/// One dictionary entry stored at a word-trie terminal: the word is form
/// `form_index` of some stem inflected by paradigm `paradigm_id`.
///
/// Packed into a trie payload as `paradigm_id << 16 | form_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryRef {
    pub paradigm_id: u16,
    pub form_index: u16,
}

impl EntryRef {
    pub fn new(paradigm_id: u16, form_index: u16) -> Self {
        Self {
            paradigm_id,
            form_index,
        }
    }

    pub fn pack(self) -> u32 {
        (self.paradigm_id as u32) << 16 | self.form_index as u32
    }

    pub fn unpack(payload: u32) -> Self {
        Self {
            paradigm_id: (payload >> 16) as u16,
            form_index: payload as u16,
        }
    }
}

/// Result of an exact word lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Homonyms stored under the word, in payload order.
    Hit(Vec<EntryRef>),
    Miss,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let e = EntryRef::new(3, 1);
        assert_eq!(e.pack(), 0x0003_0001);
        assert_eq!(EntryRef::unpack(0xFFFF_0000), EntryRef::new(u16::MAX, 0));
        assert_eq!(EntryRef::unpack(e.pack()), e);
    }
}
