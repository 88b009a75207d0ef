//! WAL (Write-Ahead Log) entry types and file operations
//!
//! This module defines the WAL entries for the authoritative tables:
//! - BeginTxn: Start of a committed transaction's record
//! - Write: Row insert or overwrite
//! - Delete: Row removal
//! - CommitTxn: Transaction is durable; replay may apply it
//!
//! ## File Format
//!
//! WAL is an append-only log file containing a sequence of framed entries
//! (see `encoding`). The transaction manager writes one transaction's
//! entries contiguously under its commit lock.
//!
//! ## Durability Modes
//!
//! - `Always` - fsync after every commit
//! - `Standard` - flush every commit, fsync every N commits OR T ms (DEFAULT)

use crate::encoding::{decode_entry, encode_entry, DecodeError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stacks_core::error::{StacksError, StacksResult};
use stacks_core::types::Key;
use stacks_core::value::Row;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// WAL entry types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalEntry {
    /// Begin transaction
    ///
    /// All writes/deletes between BeginTxn and CommitTxn belong to this
    /// transaction.
    BeginTxn {
        /// Transaction identifier
        txn_id: u64,
    },

    /// Write operation (insert or overwrite)
    Write {
        /// Key being written
        key: Key,
        /// Row being written
        row: Row,
        /// Commit version for this write
        version: u64,
    },

    /// Delete operation
    Delete {
        /// Key being deleted
        key: Key,
        /// Commit version for this delete
        version: u64,
    },

    /// Commit transaction
    ///
    /// All operations since the matching BeginTxn are now durable.
    CommitTxn {
        /// Transaction identifier
        txn_id: u64,
    },
}

impl WalEntry {
    /// Get transaction ID (for transaction boundaries)
    pub fn txn_id(&self) -> Option<u64> {
        match self {
            WalEntry::BeginTxn { txn_id } | WalEntry::CommitTxn { txn_id } => Some(*txn_id),
            _ => None,
        }
    }

    /// Get version (for writes and deletes)
    pub fn version(&self) -> Option<u64> {
        match self {
            WalEntry::Write { version, .. } | WalEntry::Delete { version, .. } => Some(*version),
            _ => None,
        }
    }
}

// ============================================================================
// Durability Modes
// ============================================================================

/// Durability mode configuration
///
/// Controls when fsync is called to ensure data reaches disk.
///
/// # Default
///
/// `Standard { interval_ms: 100, batch_size: 1000 }`: fsync every 100ms
/// or every 1000 commits, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// fsync after every commit
    Always,

    /// fsync every N commits OR every T milliseconds
    ///
    /// May lose up to batch_size commits or interval_ms of data on an
    /// OS crash. A process crash loses nothing since every commit is
    /// flushed to the OS.
    Standard {
        /// Maximum time between fsyncs in milliseconds
        interval_ms: u64,
        /// Maximum commits between fsyncs
        batch_size: usize,
    },
}

impl Default for DurabilityMode {
    fn default() -> Self {
        DurabilityMode::Standard {
            interval_ms: 100,
            batch_size: 1000,
        }
    }
}

// ============================================================================
// WAL File Operations
// ============================================================================

struct WalState {
    writer: BufWriter<File>,
    size: u64,
    last_fsync: Instant,
    commits_since_fsync: usize,
}

/// Write-Ahead Log with configurable durability
///
/// # Example
///
/// ```ignore
/// use stacks_durability::wal::{WAL, WalEntry, DurabilityMode};
///
/// let wal = WAL::open("data/wal/current.wal", DurabilityMode::default())?;
/// wal.append_txn(&[WalEntry::BeginTxn { txn_id: 1 }, WalEntry::CommitTxn { txn_id: 1 }])?;
/// let entries = wal.read_all()?;
/// ```
pub struct WAL {
    path: PathBuf,
    durability_mode: DurabilityMode,
    state: Mutex<WalState>,
}

impl WAL {
    /// Open existing WAL or create new one with specified durability mode
    ///
    /// Creates parent directories if they don't exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to WAL file
    /// * `durability_mode` - Durability mode for fsync behavior
    pub fn open<P: AsRef<Path>>(path: P, durability_mode: DurabilityMode) -> StacksResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            path,
            durability_mode,
            state: Mutex::new(WalState {
                writer: BufWriter::new(file),
                size,
                last_fsync: Instant::now(),
                commits_since_fsync: 0,
            }),
        })
    }

    /// Append one transaction's entries and apply the durability policy
    ///
    /// The entries are written back to back and flushed as one unit.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Offset of the first entry
    pub fn append_txn(&self, entries: &[WalEntry]) -> StacksResult<u64> {
        let mut encoded = Vec::new();
        for entry in entries {
            encoded.extend_from_slice(&encode_entry(entry)?);
        }

        let mut state = self.state.lock();
        let offset = state.size;
        state.writer.write_all(&encoded).map_err(|e| {
            StacksError::storage(format!("failed to write WAL at offset {}: {}", offset, e))
        })?;
        state
            .writer
            .flush()
            .map_err(|e| StacksError::storage(format!("failed to flush WAL: {}", e)))?;
        state.size += encoded.len() as u64;

        match self.durability_mode {
            DurabilityMode::Always => sync(&mut state)?,
            DurabilityMode::Standard {
                interval_ms,
                batch_size,
            } => {
                state.commits_since_fsync += 1;
                let elapsed = state.last_fsync.elapsed().as_millis() as u64;
                if elapsed >= interval_ms || state.commits_since_fsync >= batch_size {
                    sync(&mut state)?;
                }
            }
        }

        Ok(offset)
    }

    /// Force sync to disk (flush + fsync)
    pub fn fsync(&self) -> StacksResult<()> {
        let mut state = self.state.lock();
        sync(&mut state)
    }

    /// Read all entries from the beginning of the file
    ///
    /// An incomplete or corrupt frame at the very end of the file is a
    /// torn write and is ignored. Corruption followed by more data is an
    /// error.
    pub fn read_all(&self) -> StacksResult<Vec<WalEntry>> {
        {
            let mut state = self.state.lock();
            let _ = state.writer.flush();
        }

        let mut buf = Vec::new();
        File::open(&self.path)?.read_to_end(&mut buf)?;
        decode_all(&buf).map(|(entries, _)| entries)
    }

    /// Drop a torn or corrupt final frame from the file
    ///
    /// Later appends would otherwise land behind the damaged bytes and turn
    /// a recoverable tail into mid-file corruption. Returns the number of
    /// bytes removed.
    pub fn truncate_torn_tail(&self) -> StacksResult<u64> {
        let mut state = self.state.lock();
        let _ = state.writer.flush();

        let mut buf = Vec::new();
        File::open(&self.path)?.read_to_end(&mut buf)?;
        let (_, valid_len) = decode_all(&buf)?;
        let removed = buf.len() as u64 - valid_len;
        if removed > 0 {
            let file = state.writer.get_mut();
            file.set_len(valid_len)?;
            file.sync_all()?;
            state.size = valid_len;
            warn!(path = %self.path.display(), bytes = removed, "truncated torn WAL tail");
        }
        Ok(removed)
    }

    /// Get current file size (offset for next write)
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get durability mode
    pub fn durability_mode(&self) -> DurabilityMode {
        self.durability_mode
    }
}

fn sync(state: &mut WalState) -> StacksResult<()> {
    state
        .writer
        .flush()
        .map_err(|e| StacksError::storage(format!("failed to flush WAL: {}", e)))?;
    state
        .writer
        .get_mut()
        .sync_all()
        .map_err(|e| StacksError::storage(format!("failed to fsync WAL: {}", e)))?;
    state.last_fsync = Instant::now();
    state.commits_since_fsync = 0;
    Ok(())
}

/// Decode every intact frame, returning the entries and the byte length
/// they cover
fn decode_all(buf: &[u8]) -> StacksResult<(Vec<WalEntry>, u64)> {
    let mut entries = Vec::new();
    let mut pos = 0usize;
    while pos < buf.len() {
        match decode_entry(&buf[pos..], pos as u64) {
            Ok((entry, consumed)) => {
                entries.push(entry);
                pos += consumed;
            }
            Err(DecodeError::Incomplete { offset, have, .. }) => {
                warn!(offset, bytes = have, "ignoring incomplete WAL tail");
                break;
            }
            Err(DecodeError::Corrupt { offset, reason }) => {
                if is_last_frame(buf, pos) {
                    warn!(offset, %reason, "ignoring corrupt WAL tail");
                    break;
                }
                return Err(StacksError::corruption(format!(
                    "WAL offset {}: {}",
                    offset, reason
                )));
            }
        }
    }
    Ok((entries, pos as u64))
}

/// True if the frame starting at `pos` runs to (or past) the end of `buf`
fn is_last_frame(buf: &[u8], pos: usize) -> bool {
    if buf.len() < pos + 4 {
        return true;
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&buf[pos..pos + 4]);
    let total_len = u32::from_le_bytes(len_bytes) as usize;
    pos + 4 + total_len >= buf.len()
}

impl Drop for WAL {
    fn drop(&mut self) {
        let _ = self.fsync();
    }
}
