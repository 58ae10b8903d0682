//! Persisted release tag
//!
//! The file holds a single line `TAG_VERSION=<tag>`; no trailing newline is
//! written or required.

use crate::error::{IngestError, Result, Stage};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const PREFIX: &str = "TAG_VERSION=";

/// Handle on the version marker file
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted tag, or an empty string when none is recorded
    ///
    /// Creates the file (mode 0644) and its parent directory if absent.
    pub fn read(&self) -> Result<String> {
        self.ensure_parent(Stage::VersionGate)?;

        let mut file = options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(IngestError::filesystem(
                Stage::VersionGate,
                format!("open {}", self.path.display()),
            ))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(IngestError::filesystem(
            Stage::VersionGate,
            format!("read {}", self.path.display()),
        ))?;

        let tag = parse(&contents);
        debug!(path = %self.path.display(), tag, "Read version file");
        Ok(tag.to_string())
    }

    /// Replace the persisted tag
    pub fn write(&self, tag: &str) -> Result<()> {
        self.ensure_parent(Stage::Commit)?;

        let mut file = options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(IngestError::filesystem(
                Stage::Commit,
                format!("open {}", self.path.display()),
            ))?;

        write!(file, "{}{}", PREFIX, tag)
            .and_then(|_| file.sync_all())
            .map_err(IngestError::filesystem(
                Stage::Commit,
                format!("write {}", self.path.display()),
            ))?;

        debug!(path = %self.path.display(), tag, "Wrote version file");
        Ok(())
    }

    fn ensure_parent(&self, stage: Stage) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .map_err(IngestError::filesystem(
                    stage,
                    format!("create directory {}", parent.display()),
                )),
            _ => Ok(()),
        }
    }
}

/// Tag following the prefix up to the first whitespace
fn parse(contents: &str) -> &str {
    contents
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("")
}

#[cfg(unix)]
fn options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.mode(0o644);
    options
}

#[cfg(not(unix))]
fn options() -> OpenOptions {
    OpenOptions::new()
}
