//! Remote backup of the database file.
//!
//! [`Backup`] works against any [`RemoteFolder`]; [`drive::Drive`] is the
//! Google Drive implementation used by the `backup` command.
//!
//! ```rust,no_run
//! use sitelog::api::{drive::Drive, Backup};
//! use sitelog::libs::config::Config;
//! # use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let backup_config = config.backup.clone().unwrap();
//! let drive = Drive::connect(&backup_config).await?;
//! let backup = Backup::new(drive, &backup_config.remote_file_name);
//! backup.push(Path::new("labour_management.db")).await?;
//! # Ok(())
//! # }
//! ```

pub mod drive;
pub mod google_auth;

use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_debug};
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
}

/// A remote folder that holds backup files.
#[allow(async_fn_in_trait)]
pub trait RemoteFolder {
    /// Files in the folder with exactly this name.
    async fn find(&self, name: &str) -> Result<Vec<RemoteFile>>;

    async fn delete(&self, file_id: &str) -> Result<()>;

    /// Creates a new file and returns its id.
    async fn upload(&self, name: &str, content: Vec<u8>) -> Result<String>;

    async fn download(&self, file_id: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub file_id: String,
    /// How many older copies were deleted first.
    pub replaced: usize,
}

pub struct Backup<R: RemoteFolder> {
    remote: R,
    remote_name: String,
}

impl<R: RemoteFolder> Backup<R> {
    pub fn new(remote: R, remote_name: &str) -> Self {
        Self {
            remote,
            remote_name: remote_name.to_string(),
        }
    }

    /// Uploads `local`, replacing any remote file with the same name.
    pub async fn push(&self, local: &Path) -> Result<PushReport> {
        let content = match tokio::fs::read(local).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                msg_bail_anyhow!(Message::BackupLocalMissing(local.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let existing = self.remote.find(&self.remote_name).await?;
        for file in &existing {
            msg_debug!(Message::BackupDeletingRemote(file.id.clone()));
            self.remote.delete(&file.id).await?;
        }

        let file_id = self.remote.upload(&self.remote_name, content).await?;
        Ok(PushReport {
            file_id,
            replaced: existing.len(),
        })
    }

    /// Replaces `local` with the remote copy.
    ///
    /// Returns `false` and leaves `local` untouched when there is no remote
    /// copy. The download goes to a temporary file that is renamed over
    /// `local` only once complete.
    pub async fn pull(&self, local: &Path) -> Result<bool> {
        let Some(file) = self.remote.find(&self.remote_name).await?.into_iter().next() else {
            return Ok(false);
        };
        let content = self.remote.download(&file.id).await?;

        let partial = sidecar(local, "download");
        tokio::fs::write(&partial, &content).await?;
        // A leftover WAL from the old file would be replayed into the new one
        for stale in [sidecar(local, "wal"), sidecar(local, "shm")] {
            if tokio::fs::try_exists(&stale).await? {
                tokio::fs::remove_file(&stale).await?;
            }
        }
        tokio::fs::rename(&partial, local).await?;
        Ok(true)
    }
}

/// `<path>-<suffix>`, the naming SQLite uses for its own side files.
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push("-");
    name.push(suffix);
    PathBuf::from(name)
}
