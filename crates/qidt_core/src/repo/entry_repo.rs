//! Entry repository contracts and filesystem implementation.
//!
//! # Responsibility
//! - Map entries to `entries/<date>/<slug>.md` and back.
//! - Store and enumerate attachment files next to each entry.
//!
//! # Invariants
//! - `insert_entry` never overwrites; `replace_entry` requires an existing file.
//! - Scans walk the tree in file-name order, so repeated scans of an unchanged
//!   tree yield identical sequences.

use super::files::{contained_in, io_error, is_plain_component, write_new, write_replace};
use super::front_matter::{self, FrontMatter};
use super::{RepoError, RepoResult};
use crate::model::entry::{attachment_dir_for, Attachment, AttachmentKind, Entry};
use chrono::NaiveDate;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const ENTRY_EXTENSION: &str = "md";

static DATE_DIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date dir regex"));

/// Repository interface for note entries and their attachments.
pub trait EntryRepository {
    /// File location for an entry created on `date` with the given slug.
    fn entry_path(&self, date: NaiveDate, slug: &str) -> RepoResult<PathBuf>;
    /// Writes a new entry file; `Conflict` if the path is taken.
    fn insert_entry(&self, entry: &Entry) -> RepoResult<()>;
    /// Overwrites an existing entry file in place.
    fn replace_entry(&self, entry: &Entry) -> RepoResult<()>;
    /// Reads one entry file.
    fn load_entry(&self, path: &Path) -> RepoResult<Entry>;
    /// Lazily yields every readable entry; malformed files are skipped.
    fn scan_entries(&self) -> Box<dyn Iterator<Item = Entry> + '_>;
    /// Removes the entry file and its attachment directory.
    fn remove_entry(&self, path: &Path) -> RepoResult<()>;
    /// Writes one attachment into the directory of the entry at `path`,
    /// replacing any file of the same name.
    fn write_attachment(&self, path: &Path, name: &str, bytes: &[u8]) -> RepoResult<PathBuf>;
    /// Lists attachments of the entry at `path`, sorted by file name.
    fn list_attachments(&self, path: &Path) -> RepoResult<Vec<Attachment>>;
}

/// Entry repository rooted at an `entries/` directory.
#[derive(Debug, Clone)]
pub struct FsEntryRepository {
    root: PathBuf,
}

impl FsEntryRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn checked_entry_path(&self, path: &Path) -> RepoResult<PathBuf> {
        let path = contained_in(&self.root, path)?;
        if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
            return Err(RepoError::InvalidPath(path));
        }
        Ok(path)
    }

    fn write_entry(&self, entry: &Entry, create_only: bool) -> RepoResult<()> {
        let path = self.checked_entry_path(&entry.path)?;
        let meta = FrontMatter {
            date: Some(entry.date),
            tags: Some(entry.tags.clone()),
            title: Some(entry.title.clone()),
        };
        let text = front_matter::render(&meta, &entry.body).map_err(|err| RepoError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;

        if create_only {
            write_new(&path, text.as_bytes())
        } else {
            write_replace(&path, text.as_bytes())
        }
    }
}

impl EntryRepository for FsEntryRepository {
    fn entry_path(&self, date: NaiveDate, slug: &str) -> RepoResult<PathBuf> {
        if !is_plain_component(slug) {
            return Err(RepoError::InvalidPath(PathBuf::from(slug)));
        }
        Ok(self
            .root
            .join(date.format("%Y-%m-%d").to_string())
            .join(format!("{slug}.{ENTRY_EXTENSION}")))
    }

    fn insert_entry(&self, entry: &Entry) -> RepoResult<()> {
        self.write_entry(entry, true)
    }

    fn replace_entry(&self, entry: &Entry) -> RepoResult<()> {
        if !entry.path.is_file() {
            return Err(RepoError::NotFound(entry.path.clone()));
        }
        self.write_entry(entry, false)
    }

    fn load_entry(&self, path: &Path) -> RepoResult<Entry> {
        let path = self.checked_entry_path(path)?;
        read_entry_file(&path)
    }

    fn scan_entries(&self) -> Box<dyn Iterator<Item = Entry> + '_> {
        let entries = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|item| {
                item.file_type().is_file()
                    && item.path().extension().and_then(|ext| ext.to_str())
                        == Some(ENTRY_EXTENSION)
            })
            .filter_map(|item| match read_entry_file(item.path()) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("event=entry_scan module=repo status=skipped error={err}");
                    None
                }
            });
        Box::new(entries)
    }

    fn remove_entry(&self, path: &Path) -> RepoResult<()> {
        let path = self.checked_entry_path(path)?;
        fs::remove_file(&path).map_err(|err| io_error(&path, err))?;

        let attachments = attachment_dir_for(&path);
        if attachments.is_dir() {
            fs::remove_dir_all(&attachments).map_err(|err| io_error(&attachments, err))?;
        }
        Ok(())
    }

    fn write_attachment(&self, path: &Path, name: &str, bytes: &[u8]) -> RepoResult<PathBuf> {
        if !is_plain_component(name) {
            return Err(RepoError::InvalidPath(PathBuf::from(name)));
        }
        let path = self.checked_entry_path(path)?;
        if !path.is_file() {
            return Err(RepoError::NotFound(path));
        }
        let target = attachment_dir_for(&path).join(name);
        write_replace(&target, bytes)?;
        Ok(target)
    }

    fn list_attachments(&self, path: &Path) -> RepoResult<Vec<Attachment>> {
        let path = self.checked_entry_path(path)?;
        let dir = attachment_dir_for(&path);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut attachments = Vec::new();
        for item in fs::read_dir(&dir).map_err(|err| io_error(&dir, err))? {
            let item = item.map_err(|err| io_error(&dir, err))?;
            let file_path = item.path();
            if !file_path.is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().into_owned();
            attachments.push(Attachment {
                kind: AttachmentKind::from_file_name(&name),
                name,
                path: file_path,
            });
        }
        attachments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(attachments)
    }
}

fn read_entry_file(path: &Path) -> RepoResult<Entry> {
    let text = fs::read_to_string(path).map_err(|err| io_error(path, err))?;
    parse_entry(path, &text).map_err(|message| RepoError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Builds an entry from file text. Missing `date` falls back to the
/// `YYYY-MM-DD` parent directory; missing `title` falls back to the file stem.
fn parse_entry(path: &Path, text: &str) -> Result<Entry, String> {
    let (meta, body) = front_matter::parse(text)?;

    let date = match meta.date {
        Some(date) => date,
        None => date_from_parent(path).ok_or_else(|| "entry has no date".to_string())?,
    };
    let title = match meta.title {
        Some(title) => title,
        None => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    Ok(Entry {
        title,
        date,
        tags: meta.tags.unwrap_or_default(),
        body: body.to_string(),
        path: path.to_path_buf(),
    })
}

fn date_from_parent(path: &Path) -> Option<NaiveDate> {
    let dir_name = path.parent()?.file_name()?.to_str()?;
    if !DATE_DIR_RE.is_match(dir_name) {
        return None;
    }
    NaiveDate::parse_from_str(dir_name, "%Y-%m-%d").ok()
}
