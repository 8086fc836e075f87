//! Filesystem persistence for entries and structure results.
//!
//! # Responsibility
//! - Own the on-disk layout and file formats under the data directory.
//! - Keep path handling and YAML/Markdown details out of services.
//!
//! # Invariants
//! - Every file write goes through a temp file in the target directory and
//!   is renamed into place, so readers never see a half-written file.
//! - Caller-supplied paths are checked to lie inside the repository root.
//! - Bulk scans skip unreadable or malformed records instead of failing.
//!
//! # Layout
//! ```text
//! entries/<YYYY-MM-DD>/<slug>.md          front-matter + body
//! entries/<YYYY-MM-DD>/<slug>/<file>      attachments
//! results/<slug>/data.yaml                structure result
//! results/<slug>/structure.png            optional image
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod entry_repo;
mod files;
pub mod front_matter;
pub mod result_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for file persistence and parsing.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File exists but its content cannot be decoded.
    Parse {
        path: PathBuf,
        message: String,
    },
    /// Create-only write found an existing record at the target path.
    Conflict(PathBuf),
    NotFound(PathBuf),
    /// Path escapes the repository root or has the wrong shape.
    InvalidPath(PathBuf),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot parse `{}`: {message}", path.display())
            }
            Self::Conflict(path) => write!(f, "already exists: `{}`", path.display()),
            Self::NotFound(path) => write!(f, "not found: `{}`", path.display()),
            Self::InvalidPath(path) => write!(f, "invalid path: `{}`", path.display()),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
