//! WAL writer for transactions
//!
//! Stages one transaction's entries and appends them as a single unit:
//! - BeginTxn
//! - Write/Delete entries stamped with the commit version
//! - CommitTxn (the durability point)
//!
//! ## Usage
//!
//! ```ignore
//! let mut writer = TransactionWALWriter::new(&wal, txn_id);
//! writer.write_begin();
//! txn.write_to_wal(&mut writer, commit_version)?;
//! writer.write_commit()?;
//! ```

use stacks_core::error::StacksResult;
use stacks_core::types::Key;
use stacks_core::value::Row;
use stacks_durability::wal::{WalEntry, WAL};

/// Writes transaction operations to WAL
pub struct TransactionWALWriter<'a> {
    wal: &'a WAL,
    txn_id: u64,
    staged: Vec<WalEntry>,
}

impl<'a> TransactionWALWriter<'a> {
    /// Create a new WAL writer for a transaction
    pub fn new(wal: &'a WAL, txn_id: u64) -> Self {
        TransactionWALWriter {
            wal,
            txn_id,
            staged: Vec::new(),
        }
    }

    /// Stage the BeginTxn entry
    pub fn write_begin(&mut self) {
        self.staged.push(WalEntry::BeginTxn {
            txn_id: self.txn_id,
        });
    }

    /// Stage a put
    pub fn write_put(&mut self, key: Key, row: Row, version: u64) {
        self.staged.push(WalEntry::Write { key, row, version });
    }

    /// Stage a delete
    pub fn write_delete(&mut self, key: Key, version: u64) {
        self.staged.push(WalEntry::Delete { key, version });
    }

    /// Stage CommitTxn and append everything to the WAL
    ///
    /// Once this returns Ok the transaction is durable under the WAL's
    /// durability mode, and recovery will replay it.
    pub fn write_commit(mut self) -> StacksResult<()> {
        self.staged.push(WalEntry::CommitTxn {
            txn_id: self.txn_id,
        });
        self.wal.append_txn(&self.staged)?;
        Ok(())
    }

    /// Number of entries staged so far
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_core::model::BookCopy;
    use stacks_core::types::CatalogNumber;
    use stacks_durability::wal::DurabilityMode;
    use tempfile::TempDir;

    #[test]
    fn test_nothing_reaches_wal_before_commit() {
        let temp = TempDir::new().unwrap();
        let wal = WAL::open(temp.path().join("w.wal"), DurabilityMode::Always).unwrap();

        let cn = CatalogNumber::new("111").unwrap();
        let mut writer = TransactionWALWriter::new(&wal, 7);
        writer.write_begin();
        writer.write_put(
            Key::book(&cn),
            Row::Book(BookCopy {
                catalog_number: cn.clone(),
                title: "T".to_string(),
                author: "A".to_string(),
                available_count: 1,
            }),
            3,
        );
        writer.write_delete(Key::book(&cn), 3);
        assert_eq!(writer.staged_len(), 3);
        assert_eq!(wal.size(), 0);

        writer.write_commit().unwrap();
        let entries = wal.read_all().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0], WalEntry::BeginTxn { txn_id: 7 });
        assert_eq!(entries[3], WalEntry::CommitTxn { txn_id: 7 });
    }
}
