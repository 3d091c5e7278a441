//! Shared header parsing and little-endian record reading for the binary
//! dictionary files (`MTRI`, `MPAR`, `MTAG`).

use crate::error::FormatError;

/// Size of the common header: magic(4) + version(2) + count(4).
pub const HEADER_SIZE: usize = 4 + 2 + 4;

/// Validate the common header and return the record count plus a reader
/// positioned right after it.
pub(crate) fn parse_header<'a>(
    data: &'a [u8],
    section: &'static str,
    magic: &[u8; 4],
    version: u16,
) -> Result<(u32, ByteReader<'a>), FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::TooShort {
            section,
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    let mut r = ByteReader::new(data, section);
    let found: [u8; 4] = r.array()?;
    if &found != magic {
        return Err(FormatError::InvalidMagic {
            section,
            expected: *magic,
            found,
        });
    }
    let found_version = r.u16()?;
    if found_version != version {
        return Err(FormatError::UnsupportedVersion {
            section,
            expected: version,
            found: found_version,
        });
    }
    let count = r.u32()?;
    Ok((count, r))
}

pub(crate) fn write_header(buf: &mut Vec<u8>, magic: &[u8; 4], version: u16, count: u32) {
    buf.extend_from_slice(magic);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
}

/// Bounds-checked cursor over a byte slice. Every read that would run past
/// the end fails with `FormatError::Truncated` instead of panicking.
#[derive(Debug)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], section: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            section,
        }
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len());
        match end {
            Some(end) => {
                let out = &self.data[self.pos..end];
                self.pos = end;
                Ok(out)
            }
            None => Err(FormatError::Truncated {
                section: self.section,
                offset: self.pos,
            }),
        }
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    pub fn u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Read `n` bytes as UTF-8.
    pub fn str(&mut self, n: usize) -> Result<&'a str, FormatError> {
        let offset = self.pos;
        let raw = self.bytes(n)?;
        std::str::from_utf8(raw).map_err(|e| FormatError::Malformed {
            section: self.section,
            reason: format!("invalid UTF-8 at byte {offset}: {e}"),
        })
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail unless the whole buffer has been consumed.
    pub fn finish(&self) -> Result<(), FormatError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(FormatError::TrailingBytes {
                section: self.section,
                count,
            }),
        }
    }

    pub fn malformed(&self, reason: impl Into<String>) -> FormatError {
        FormatError::Malformed {
            section: self.section,
            reason: reason.into(),
        }
    }
}
