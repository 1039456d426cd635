//! Clipboard export of confirmed codes
//!
//! The platform clipboard is an external collaborator; it sits behind the
//! [`Clipboard`] trait. A failed write is reported once as a [`CopyNotice`]
//! and never retried.

use crate::error::{Result, ScanError};
use crate::models::ConfirmedCodes;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sink for exported text
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// User-facing result of a copy action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyNotice {
    /// Every confirmed code was written
    Copied {
        /// Number of codes written
        count: usize,
    },
    /// The clipboard rejected the write
    Failed {
        /// Error text from the clipboard
        reason: String,
    },
    /// Nothing has been confirmed; the clipboard was not touched
    NothingToCopy,
}

impl CopyNotice {
    /// True for [`CopyNotice::Copied`]
    pub fn is_success(&self) -> bool {
        matches!(self, CopyNotice::Copied { .. })
    }
}

impl fmt::Display for CopyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyNotice::Copied { .. } => f.write_str("Copied to clipboard!"),
            CopyNotice::Failed { .. } => f.write_str("Failed to copy to clipboard"),
            CopyNotice::NothingToCopy => f.write_str("Nothing to copy"),
        }
    }
}

/// Write the newline-joined collection to `clipboard`
pub fn copy_codes(codes: &ConfirmedCodes, clipboard: &mut dyn Clipboard) -> CopyNotice {
    if codes.is_empty() {
        return CopyNotice::NothingToCopy;
    }
    match clipboard.write_text(&codes.to_text()) {
        Ok(()) => {
            info!(count = codes.len(), "Copied codes to clipboard");
            CopyNotice::Copied { count: codes.len() }
        }
        Err(err) => {
            warn!(error = %err, "Failed to copy codes to clipboard");
            CopyNotice::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// In-memory clipboard holding the last written text
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// Empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written text, if any
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_owned());
        Ok(())
    }
}

/// Clipboard stand-in that overwrites a file on every write
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    /// Target file for exports
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path written on each copy
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .map_err(|err| ScanError::Clipboard(format!("{}: {}", self.path.display(), err)))
    }
}
