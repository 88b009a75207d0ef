//! A single CSV audit log file
//!
//! Every operation takes the log's mutex for its whole duration, so a
//! rewrite (read, filter, write temp, rename) never interleaves with an
//! append. The file is created with its header row on first write; a
//! missing file reads as empty.

use super::rows::AuditRow;
use parking_lot::Mutex;
use stacks_core::error::{StacksError, StacksResult};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Append/rewrite-capable CSV log of `R` rows
pub struct AuditLog<R: AuditRow> {
    path: PathBuf,
    lock: Mutex<()>,
    _rows: PhantomData<fn() -> R>,
}

impl<R: AuditRow> AuditLog<R> {
    /// Log stored at `path` (nothing is touched until the first write)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AuditLog {
            path: path.into(),
            lock: Mutex::new(()),
            _rows: PhantomData,
        }
    }

    /// File path of this log
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every data row, in file order
    pub fn read_rows(&self) -> StacksResult<Vec<R>> {
        let _guard = self.lock.lock();
        self.read_unlocked()
    }

    /// Append one row unconditionally
    pub fn append(&self, row: &R) -> StacksResult<()> {
        let _guard = self.lock.lock();
        self.append_unlocked(std::slice::from_ref(row))
    }

    /// Append `row` unless a row with the same natural key is present
    ///
    /// Returns true if the row was written.
    pub fn append_if_absent(&self, row: &R) -> StacksResult<bool> {
        let _guard = self.lock.lock();
        let key = row.natural_key();
        if self.read_unlocked()?.iter().any(|r| r.natural_key() == key) {
            return Ok(false);
        }
        self.append_unlocked(std::slice::from_ref(row))?;
        Ok(true)
    }

    /// Append the rows `missing` computes from the current contents
    ///
    /// Read and append happen under one lock acquisition. Returns the
    /// number of rows appended.
    pub fn extend_with<F>(&self, missing: F) -> StacksResult<usize>
    where
        F: FnOnce(&[R]) -> Vec<R>,
    {
        let _guard = self.lock.lock();
        let current = self.read_unlocked()?;
        let rows = missing(&current);
        if !rows.is_empty() {
            self.append_unlocked(&rows)?;
        }
        Ok(rows.len())
    }

    /// Replace the whole log with `transform(current rows)`
    ///
    /// Writes a temporary file, syncs it, renames it over the log and
    /// syncs the directory. Returns the number of rows written.
    pub fn rewrite<F>(&self, transform: F) -> StacksResult<usize>
    where
        F: FnOnce(Vec<R>) -> Vec<R>,
    {
        let _guard = self.lock.lock();
        let rows = transform(self.read_unlocked()?);
        self.replace_unlocked(&rows)?;
        Ok(rows.len())
    }

    /// Like `rewrite`, but `transform` may return `None` to leave the file
    /// as it is
    ///
    /// Returns the number of rows written, or `None` if nothing was.
    pub fn rewrite_if<F>(&self, transform: F) -> StacksResult<Option<usize>>
    where
        F: FnOnce(Vec<R>) -> Option<Vec<R>>,
    {
        let _guard = self.lock.lock();
        match transform(self.read_unlocked()?) {
            Some(rows) => {
                self.replace_unlocked(&rows)?;
                Ok(Some(rows.len()))
            }
            None => Ok(None),
        }
    }

    /// Drop every row whose natural key is `key`
    ///
    /// Returns the number of rows removed. The file is left untouched when
    /// nothing matches.
    pub fn remove_key(&self, key: &R::NaturalKey) -> StacksResult<usize> {
        let _guard = self.lock.lock();
        let rows = self.read_unlocked()?;
        let before = rows.len();
        let kept: Vec<R> = rows
            .into_iter()
            .filter(|r| &r.natural_key() != key)
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.replace_unlocked(&kept)?;
        }
        Ok(removed)
    }

    /// Natural keys currently in the log
    pub fn keys(&self) -> StacksResult<HashSet<R::NaturalKey>> {
        Ok(self.read_rows()?.iter().map(AuditRow::natural_key).collect())
    }

    // ========================================================================
    // Unlocked helpers (caller holds `lock`)
    // ========================================================================

    fn read_unlocked(&self) -> StacksResult<Vec<R>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| csv_error(&self.path, e))?
            .clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if !headers.iter().eq(R::HEADER.iter().copied()) {
            return Err(StacksError::corruption(format!(
                "{}: unexpected header {:?}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>()
            )));
        }

        reader
            .deserialize::<R>()
            .map(|row| row.map_err(|e| csv_error(&self.path, e)))
            .collect()
    }

    fn append_unlocked(&self, rows: &[R]) -> StacksResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer
                .write_record(R::HEADER)
                .map_err(|e| csv_error(&self.path, e))?;
        }
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| csv_error(&self.path, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StacksError::Io(e.into_error()))?;
        file.sync_data()?;
        Ok(())
    }

    fn replace_unlocked(&self, rows: &[R]) -> StacksResult<()> {
        let temp_path = self.path.with_extension("csv.tmp");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(R::HEADER)
            .map_err(|e| csv_error(&temp_path, e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| csv_error(&temp_path, e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StacksError::Io(e.into_error()))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;

        if let Some(parent) = self.path.parent() {
            if parent.exists() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }
}

fn csv_error(path: &Path, e: csv::Error) -> StacksError {
    let message = format!("{}: {}", path.display(), e);
    match e.into_kind() {
        csv::ErrorKind::Io(io) => StacksError::Io(io),
        _ => StacksError::serialization(message),
    }
}
