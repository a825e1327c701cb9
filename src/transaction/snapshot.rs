//! Pre-transaction copy of the config file and its rollback guard.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Bytes of the config file taken right before a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    Present(Vec<u8>),
    /// The file did not exist.
    Absent,
}

impl Snapshot {
    pub fn capture(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Snapshot::Present(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Snapshot::Absent),
            Err(e) => Err(e),
        }
    }

    /// Put `path` back to the captured content.
    pub fn restore(&self, path: &Path) -> io::Result<()> {
        match self {
            Snapshot::Present(bytes) => fs::write(path, bytes),
            Snapshot::Absent => match fs::remove_file(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
        }
    }
}

/// Restores the snapshot unless the transaction commits.
///
/// Armed once the new body has been written. If the owning future is dropped
/// mid-handshake the restore happens in `Drop`.
#[derive(Debug)]
pub struct RollbackGuard {
    path: PathBuf,
    snapshot: Option<Snapshot>,
}

impl RollbackGuard {
    pub fn arm(path: &Path, snapshot: Snapshot) -> Self {
        Self {
            path: path.to_path_buf(),
            snapshot: Some(snapshot),
        }
    }

    /// Keep the written file.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    pub fn rollback(mut self) -> io::Result<()> {
        match self.snapshot.take() {
            Some(snapshot) => snapshot.restore(&self.path),
            None => Ok(()),
        }
    }
}

impl Drop for RollbackGuard {
    fn drop(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        match snapshot.restore(&self.path) {
            Ok(()) => tracing::warn!(path = ?self.path, "Transaction abandoned, config file restored"),
            Err(e) => tracing::error!(
                path = ?self.path,
                error = %e,
                "Transaction abandoned and config file could not be restored"
            ),
        }
    }
}
