//! The set of files that make up one compiled dictionary.

use std::fs::{self, File};
use std::io;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, debug_span};

pub const WORDS_FILE: &str = "words.trie";
pub const PARADIGMS_FILE: &str = "paradigms.bin";
pub const TAGS_FILE: &str = "tags.bin";
pub const META_FILE: &str = "meta.json";
pub const SUFFIXES_FILE: &str = "suffixes.trie";
pub const FREQUENCIES_FILE: &str = "frequencies.trie";
pub const NORMALIZE_FILE: &str = "normalize.toml";

/// Bytes of one bundle file: either owned or memory-mapped.
#[derive(Debug)]
pub enum FileData {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for FileData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileData::Owned(v) => v,
            FileData::Mapped(m) => m,
        }
    }
}

impl From<Vec<u8>> for FileData {
    fn from(v: Vec<u8>) -> Self {
        FileData::Owned(v)
    }
}

impl FileData {
    fn map(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(FileData::Owned(Vec::new()));
        }
        // SAFETY: The file is opened read-only and the mapping is immutable.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(FileData::Mapped(mmap))
    }

    fn map_optional(path: &Path) -> io::Result<Option<Self>> {
        match Self::map(path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A dictionary bundle held in memory, ready for `DictionaryStore::open`.
#[derive(Debug)]
pub struct DictionaryBundle {
    pub words: FileData,
    pub paradigms: FileData,
    pub tags: FileData,
    pub meta: FileData,
    pub suffixes: Option<FileData>,
    pub frequencies: Option<FileData>,
    pub normalize: Option<FileData>,
}

impl DictionaryBundle {
    /// Map every file of the bundle directory at `dir`. Optional files that
    /// do not exist are left as `None`.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let _span = debug_span!("bundle_open", dir = %dir.display()).entered();
        let bundle = Self {
            words: FileData::map(&dir.join(WORDS_FILE))?,
            paradigms: FileData::map(&dir.join(PARADIGMS_FILE))?,
            tags: FileData::map(&dir.join(TAGS_FILE))?,
            meta: FileData::map(&dir.join(META_FILE))?,
            suffixes: FileData::map_optional(&dir.join(SUFFIXES_FILE))?,
            frequencies: FileData::map_optional(&dir.join(FREQUENCIES_FILE))?,
            normalize: FileData::map_optional(&dir.join(NORMALIZE_FILE))?,
        };
        debug!(
            words_bytes = bundle.words.len(),
            has_suffixes = bundle.suffixes.is_some(),
            has_frequencies = bundle.frequencies.is_some(),
            has_normalize = bundle.normalize.is_some(),
            "bundle mapped"
        );
        Ok(bundle)
    }

    /// Bytes of a bundle file by its file name.
    pub fn file(&self, name: &str) -> Option<&[u8]> {
        match name {
            WORDS_FILE => Some(&self.words[..]),
            PARADIGMS_FILE => Some(&self.paradigms[..]),
            TAGS_FILE => Some(&self.tags[..]),
            META_FILE => Some(&self.meta[..]),
            SUFFIXES_FILE => self.suffixes.as_deref(),
            FREQUENCIES_FILE => self.frequencies.as_deref(),
            NORMALIZE_FILE => self.normalize.as_deref(),
            _ => None,
        }
    }

    /// Every file present in the bundle, by name.
    pub fn files(&self) -> impl Iterator<Item = (&'static str, &[u8])> {
        [
            WORDS_FILE,
            PARADIGMS_FILE,
            TAGS_FILE,
            META_FILE,
            SUFFIXES_FILE,
            FREQUENCIES_FILE,
            NORMALIZE_FILE,
        ]
        .into_iter()
        .filter_map(move |name| self.file(name).map(|data| (name, data)))
    }

    /// Write the bundle as a directory, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for (name, data) in self.files() {
            fs::write(dir.join(name), data)?;
        }
        Ok(())
    }
}
