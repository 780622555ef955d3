// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Filesystem provider.
//!
//! Layer of indirection between the organizer engine and the operating
//! system. The engine only ever needs three things from a filesystem:
//! a non-recursive directory listing, idempotent directory creation,
//! and a best-effort move of one file to a new path. Modeling those as
//! a trait lets test suites substitute an in-memory filesystem without
//! touching process-wide state.
//!
//! # Collisions
//!
//! A move whose destination already exists is refused rather than
//! overwritten. The organizer only ever relocates files; it never
//! destroys one, so a name collision surfaces as a per-file error for
//! the caller to inspect.

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Filesystem operations the organizer engine depends on.
pub trait Filesystem {
    /// List top-level entries of target directory, non-recursively.
    ///
    /// # Errors
    ///
    /// - Return [`FsError::ListDir`] if the directory cannot be read.
    fn list_dir(&self, path: impl AsRef<Path>) -> Result<Vec<DirEntryInfo>>;

    /// Check whether target path names an existing directory.
    fn is_dir(&self, path: impl AsRef<Path>) -> bool;

    /// Create target directory and any missing intermediate segments.
    ///
    /// Idempotent. An already existing directory is not an error.
    ///
    /// # Errors
    ///
    /// - Return [`FsError::CreateDir`] if creation fails.
    fn create_dir_all(&self, path: impl AsRef<Path>) -> Result<()>;

    /// Move a file to a new path within the same volume.
    ///
    /// # Errors
    ///
    /// - Return [`FsError::MoveFile`] if the move fails, including when
    ///   the destination already exists.
    fn move_file(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()>;
}

/// One top-level directory entry, as much of it as classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Entry file name, lossily converted when not valid UTF-8.
    pub name: String,

    /// Whether the entry is a subdirectory.
    pub is_dir: bool,

    /// Last modification time of the entry.
    pub modified: SystemTime,
}

/// Filesystem access through [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl OsFilesystem {
    /// Construct new operating system filesystem provider.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for OsFilesystem {
    fn list_dir(&self, path: impl AsRef<Path>) -> Result<Vec<DirEntryInfo>> {
        let list_err = |err: std::io::Error| FsError::ListDir {
            source: err,
            path: path.as_ref().to_path_buf(),
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(path.as_ref()).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let metadata = entry.metadata().map_err(list_err)?;

            // INVARIANT: A modification time the platform cannot report
            // degrades to "now", i.e., age zero.
            let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());

            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.is_dir(),
                modified,
            });
        }

        Ok(entries)
    }

    fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_dir()
    }

    fn create_dir_all(&self, path: impl AsRef<Path>) -> Result<()> {
        mkdirp::mkdirp(path.as_ref()).map_err(|err| FsError::CreateDir {
            source: err,
            path: path.as_ref().to_path_buf(),
        })?;

        Ok(())
    }

    fn move_file(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        let move_err = |err: std::io::Error| FsError::MoveFile {
            source: err,
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
        };

        // INVARIANT: Never clobber an existing destination. Rename on
        // most platforms silently replaces it, so refuse up front.
        if to.as_ref().exists() {
            return Err(move_err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "destination already exists",
            )));
        }

        fs::rename(from.as_ref(), to.as_ref()).map_err(move_err)
    }
}

/// Filesystem provider error types.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Directory listing cannot be produced.
    #[error("failed to list directory at {:?}", path.display())]
    ListDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be created.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be moved to its destination.
    #[error("failed to move {:?} to {:?}", from.display(), to.display())]
    MoveFile {
        #[source]
        source: std::io::Error,
        from: PathBuf,
        to: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = FsError> = std::result::Result<T, E>;
