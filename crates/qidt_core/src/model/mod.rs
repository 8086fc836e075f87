//! Domain model for notebook entries and per-structure calculation results.
//!
//! # Responsibility
//! - Define the records the stores read and write.
//! - Own input validation shared by every write path.
//!
//! # Invariants
//! - A slug is derived from a title or structure name by replacing spaces
//!   with `_`; it is the on-disk identity of both record kinds.
//! - Derived result quantities (μ, QIDE) are never stored as fields.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod entry;
pub mod result;

/// Filesystem-safe identifier used for file and directory names.
pub fn slugify(value: &str) -> String {
    value.replace(' ', "_")
}

/// Fails when the slug of `name` cannot serve as a single file name.
pub(crate) fn check_slug(name: &str) -> Result<(), ValidationError> {
    let slug = slugify(name);
    if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\', '\0']) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Input validation failures raised before anything touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyBody,
    EmptyStructureName,
    /// Upload extension is outside the accepted attachment list.
    UnsupportedAttachment(String),
    /// Upload name has no usable final path component.
    InvalidFileName(String),
    /// Title or structure name contains a path separator or is `.`/`..`.
    InvalidName(String),
    /// Caller-supplied path does not point inside the store root.
    OutsideRoot(PathBuf),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyBody => write!(f, "body is required"),
            Self::EmptyStructureName => write!(f, "structure name is required"),
            Self::UnsupportedAttachment(name) => {
                write!(f, "unsupported attachment type: `{name}`")
            }
            Self::InvalidFileName(name) => write!(f, "invalid file name: `{name}`"),
            Self::InvalidName(name) => {
                write!(f, "name must not contain `/` or `\\` or be `.`/`..`: `{name}`")
            }
            Self::OutsideRoot(path) => {
                write!(f, "path is outside the store root: `{}`", path.display())
            }
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{check_slug, slugify, ValidationError};

    #[test]
    fn slugify_replaces_spaces_only() {
        assert_eq!(slugify("MMA-MAA Dimer"), "MMA-MAA_Dimer");
        assert_eq!(slugify("a  b"), "a__b");
        assert_eq!(slugify("界面 反応"), "界面_反応");
    }

    #[test]
    fn check_slug_rejects_separators_and_dot_names() {
        assert!(check_slug("MMA Dimer").is_ok());
        assert!(check_slug("a.b").is_ok());
        for name in ["a/b", "a\\b", ".", ".."] {
            assert_eq!(
                check_slug(name),
                Err(ValidationError::InvalidName(name.to_string()))
            );
        }
    }
}
