//! WAL entry encoding and decoding
//!
//! This module provides encoding/decoding for WAL entries with CRC32 checksums
//! for corruption detection.
//!
//! ## Entry Format
//!
//! ```text
//! [length: u32][type: u8][payload: bytes][crc32: u32]
//! ```
//!
//! - **length**: Total size of type + payload + crc (NOT including length itself)
//! - **type**: Entry type tag (1=BeginTxn, 2=Write, 3=Delete, 4=CommitTxn)
//! - **payload**: MessagePack-serialized `WalEntry`
//! - **crc32**: CRC32 checksum over \[type\]\[payload\]

use crate::wal::WalEntry;
use crc32fast::Hasher;
use stacks_core::error::StacksError;
use thiserror::Error;

const TYPE_BEGIN_TXN: u8 = 1;
const TYPE_WRITE: u8 = 2;
const TYPE_DELETE: u8 = 3;
const TYPE_COMMIT_TXN: u8 = 4;

/// Minimum valid frame body: type(1) + crc(4)
const MIN_BODY_LEN: usize = 5;

/// Why a frame could not be decoded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer ends before the frame does (partial write at the tail)
    #[error("offset {offset}: incomplete entry, have {have} bytes, need {needed}")]
    Incomplete {
        /// File offset of the frame
        offset: u64,
        /// Bytes available
        have: usize,
        /// Bytes the frame declares
        needed: usize,
    },

    /// Frame is complete but its contents are invalid
    #[error("offset {offset}: {reason}")]
    Corrupt {
        /// File offset of the frame
        offset: u64,
        /// What was wrong
        reason: String,
    },
}

impl From<DecodeError> for StacksError {
    fn from(e: DecodeError) -> Self {
        StacksError::corruption(e.to_string())
    }
}

fn type_tag(entry: &WalEntry) -> u8 {
    match entry {
        WalEntry::BeginTxn { .. } => TYPE_BEGIN_TXN,
        WalEntry::Write { .. } => TYPE_WRITE,
        WalEntry::Delete { .. } => TYPE_DELETE,
        WalEntry::CommitTxn { .. } => TYPE_COMMIT_TXN,
    }
}

fn checksum(tag: u8, payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[tag]);
    hasher.update(payload);
    hasher.finalize()
}

/// Encode WAL entry to bytes
///
/// Format: `[length: u32][type: u8][payload: bytes][crc32: u32]`
///
/// # Errors
///
/// Returns a serialization error if the entry cannot be encoded.
pub fn encode_entry(entry: &WalEntry) -> Result<Vec<u8>, StacksError> {
    let tag = type_tag(entry);
    let payload = rmp_serde::to_vec(entry)
        .map_err(|e| StacksError::serialization(format!("WAL entry: {}", e)))?;

    let total_len = 1 + payload.len() + 4;
    let mut buf = Vec::with_capacity(4 + total_len);
    buf.extend_from_slice(&(total_len as u32).to_le_bytes());
    buf.push(tag);
    buf.extend_from_slice(&payload);
    buf.extend_from_slice(&checksum(tag, &payload).to_le_bytes());
    Ok(buf)
}

/// Decode WAL entry from bytes with CRC validation
///
/// Returns the decoded entry and the number of bytes consumed.
///
/// # Arguments
///
/// * `buf` - Buffer starting at the frame
/// * `offset` - File offset for error reporting
///
/// # Errors
///
/// `DecodeError::Incomplete` when the buffer is shorter than the frame;
/// `DecodeError::Corrupt` on bad length, CRC mismatch, undecodable payload
/// or a type tag that disagrees with the payload.
pub fn decode_entry(buf: &[u8], offset: u64) -> Result<(WalEntry, usize), DecodeError> {
    if buf.len() < 4 {
        return Err(DecodeError::Incomplete {
            offset,
            have: buf.len(),
            needed: 4,
        });
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&buf[..4]);
    let total_len = u32::from_le_bytes(len_bytes) as usize;

    if total_len < MIN_BODY_LEN {
        return Err(DecodeError::Corrupt {
            offset,
            reason: format!("invalid entry length {}", total_len),
        });
    }
    if buf.len() < 4 + total_len {
        return Err(DecodeError::Incomplete {
            offset,
            have: buf.len(),
            needed: 4 + total_len,
        });
    }

    let body = &buf[4..4 + total_len];
    let tag = body[0];
    let payload = &body[1..total_len - 4];
    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&body[total_len - 4..]);
    let expected_crc = u32::from_le_bytes(crc_bytes);

    let actual_crc = checksum(tag, payload);
    if actual_crc != expected_crc {
        return Err(DecodeError::Corrupt {
            offset,
            reason: format!(
                "CRC mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            ),
        });
    }

    let entry: WalEntry = rmp_serde::from_slice(payload).map_err(|e| DecodeError::Corrupt {
        offset,
        reason: format!("deserialization failed: {}", e),
    })?;

    if type_tag(&entry) != tag {
        return Err(DecodeError::Corrupt {
            offset,
            reason: format!(
                "type tag mismatch: expected {}, got {}",
                type_tag(&entry),
                tag
            ),
        });
    }

    Ok((entry, 4 + total_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_core::model::BookCopy;
    use stacks_core::types::{CatalogNumber, Key};
    use stacks_core::value::Row;

    fn write_entry() -> WalEntry {
        let cn = CatalogNumber::new("111").unwrap();
        WalEntry::Write {
            key: Key::book(&cn),
            row: Row::Book(BookCopy {
                catalog_number: cn,
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                available_count: 1,
            }),
            version: 7,
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let entry = write_entry();
        let encoded = encode_entry(&entry).unwrap();
        let (decoded, consumed) = decode_entry(&encoded, 0).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_frame_layout() {
        let encoded = encode_entry(&WalEntry::CommitTxn { txn_id: 3 }).unwrap();
        let declared = u32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
        assert_eq!(declared as usize, encoded.len() - 4);
        assert_eq!(encoded[4], TYPE_COMMIT_TXN);
    }

    #[test]
    fn test_truncated_frame_is_incomplete() {
        let encoded = encode_entry(&write_entry()).unwrap();
        let cut = &encoded[..encoded.len() - 3];
        assert!(matches!(
            decode_entry(cut, 40),
            Err(DecodeError::Incomplete { offset: 40, .. })
        ));
        assert!(matches!(
            decode_entry(&encoded[..2], 0),
            Err(DecodeError::Incomplete { needed: 4, .. })
        ));
    }

    #[test]
    fn test_flipped_bit_is_corrupt() {
        let mut encoded = encode_entry(&write_entry()).unwrap();
        let mid = encoded.len() / 2;
        encoded[mid] ^= 0x01;
        let err = decode_entry(&encoded, 0).unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt { .. }));
        assert!(err.to_string().contains("CRC mismatch"));
    }

    #[test]
    fn test_tiny_length_is_corrupt() {
        let buf = [2u8, 0, 0, 0, 1, 1];
        assert!(matches!(
            decode_entry(&buf, 0),
            Err(DecodeError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_mismatched_tag_is_corrupt() {
        let mut encoded = encode_entry(&WalEntry::BeginTxn { txn_id: 1 }).unwrap();
        encoded[4] = TYPE_DELETE;
        // Recompute CRC so only the tag check can fail
        let body_end = encoded.len() - 4;
        let crc = checksum(encoded[4], &encoded[5..body_end]);
        encoded[body_end..].copy_from_slice(&crc.to_le_bytes());
        let err = decode_entry(&encoded, 0).unwrap_err();
        assert!(err.to_string().contains("type tag mismatch"));
    }

    #[test]
    fn test_decode_error_maps_to_corruption() {
        let err: StacksError = DecodeError::Corrupt {
            offset: 9,
            reason: "bad".to_string(),
        }
        .into();
        assert!(matches!(err, StacksError::Corruption { .. }));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_strict_prefix_is_incomplete(cut in 0usize..1000) {
                let encoded = encode_entry(&write_entry()).unwrap();
                let cut = cut % encoded.len();
                let is_incomplete = matches!(
                    decode_entry(&encoded[..cut], 0),
                    Err(DecodeError::Incomplete { .. })
                );
                prop_assert!(is_incomplete);
            }

            #[test]
            fn garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
                let _ = decode_entry(&bytes, 0);
            }
        }
    }
}
