//! Checksummed binary frame around a collection's records.
//!
//! Layout:
//!
//! ```text
//! [magic "OSYC" (4)][version (1)][body length u64 LE (8)][body][CRC32 u32 LE (4)]
//! ```
//!
//! The CRC covers everything before it, header included.

use crc32fast::Hasher as Crc32;

use crate::error::{Error, Result};

/// Magic bytes opening every records file.
pub(crate) const FRAME_MAGIC: &[u8; 4] = b"OSYC";

/// Current frame format version.
pub(crate) const FRAME_VERSION: u8 = 1;

/// magic(4) + version(1) + length(8)
const HEADER_LEN: usize = 13;

const CRC_LEN: usize = 4;

fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(data);
    hasher.finalize()
}

/// Wraps `body` into a frame.
pub(crate) fn encode(body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + body.len() + CRC_LEN);
    buf.extend_from_slice(FRAME_MAGIC);
    buf.push(FRAME_VERSION);
    buf.extend_from_slice(&(body.len() as u64).to_le_bytes());
    buf.extend_from_slice(body);

    let crc = checksum(&buf);
    buf.extend_from_slice(&crc.to_le_bytes());
    buf
}

/// Validates a frame and returns its body.
///
/// # Errors
///
/// Returns [`Error::Corrupted`] on a wrong magic, version, length or
/// checksum.
pub(crate) fn decode(data: &[u8]) -> Result<&[u8]> {
    if data.len() < HEADER_LEN + CRC_LEN {
        return Err(Error::Corrupted("records file too small".to_string()));
    }

    if &data[0..4] != FRAME_MAGIC {
        return Err(Error::Corrupted("records file has invalid magic".to_string()));
    }

    if data[4] != FRAME_VERSION {
        return Err(Error::Corrupted(format!(
            "unsupported records file version {}",
            data[4]
        )));
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&data[5..HEADER_LEN]);
    let body_len = u64::from_le_bytes(len_bytes);

    let expected = (data.len() - HEADER_LEN - CRC_LEN) as u64;
    if body_len != expected {
        return Err(Error::Corrupted(format!(
            "records file length mismatch: header says {body_len}, found {expected}"
        )));
    }

    let crc_start = data.len() - CRC_LEN;
    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&data[crc_start..]);
    if u32::from_le_bytes(crc_bytes) != checksum(&data[..crc_start]) {
        return Err(Error::Corrupted("records file checksum mismatch".to_string()));
    }

    Ok(&data[HEADER_LEN..crc_start])
}
