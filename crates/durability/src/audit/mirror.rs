use super::log::AuditLog;
use super::rows::{IssueRow, RegistrationRow, ReturnRow};
use stacks_core::error::StacksResult;
use std::path::{Path, PathBuf};

/// File name of the registration log
pub const REGISTRATIONS_FILE: &str = "registrations.csv";
/// File name of the issue log
pub const ISSUES_FILE: &str = "issues.csv";
/// File name of the return log
pub const RETURNS_FILE: &str = "returns.csv";

/// The three audit logs of one ledger, kept in a single directory
pub struct AuditMirror {
    dir: PathBuf,
    registrations: AuditLog<RegistrationRow>,
    issues: AuditLog<IssueRow>,
    returns: AuditLog<ReturnRow>,
}

impl AuditMirror {
    /// Open the mirror in `dir`, creating the directory if needed
    ///
    /// The log files themselves are created on first write.
    pub fn open(dir: impl AsRef<Path>) -> StacksResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(AuditMirror {
            registrations: AuditLog::new(dir.join(REGISTRATIONS_FILE)),
            issues: AuditLog::new(dir.join(ISSUES_FILE)),
            returns: AuditLog::new(dir.join(RETURNS_FILE)),
            dir,
        })
    }

    /// Directory holding the logs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Registration log
    pub fn registrations(&self) -> &AuditLog<RegistrationRow> {
        &self.registrations
    }

    /// Issue log
    pub fn issues(&self) -> &AuditLog<IssueRow> {
        &self.issues
    }

    /// Return log
    pub fn returns(&self) -> &AuditLog<ReturnRow> {
        &self.returns
    }
}

impl std::fmt::Debug for AuditMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditMirror").field("dir", &self.dir).finish()
    }
}
