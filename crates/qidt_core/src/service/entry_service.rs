//! Notebook entry use-case service.
//!
//! # Responsibility
//! - Create, list, update and delete entries with input validation.
//! - Store attachments under the entry they belong to.
//! - Provide list helpers (filtering, tag picker values, display order).
//!
//! # Invariants
//! - Title and body are validated before any write.
//! - `update_entry` keeps the original date and file path.
//! - Creating an entry whose slug already exists for that day is a conflict.
//! - Attachments belong to the entry file, not to its current title.

use crate::model::entry::{Attachment, AttachmentUpload, Entry, EntryDraft, EntryFilter};
use crate::model::{slugify, ValidationError};
use crate::repo::entry_repo::EntryRepository;
use crate::repo::RepoError;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    Validation(ValidationError),
    /// An entry with the same slug already exists on the same day.
    Conflict(PathBuf),
    EntryNotFound(PathBuf),
    Repo(RepoError),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(path) => write!(f, "entry already exists: `{}`", path.display()),
            Self::EntryNotFound(path) => write!(f, "entry not found: `{}`", path.display()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for EntryServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(path) => Self::Conflict(path),
            RepoError::NotFound(path) => Self::EntryNotFound(path),
            RepoError::InvalidPath(path) => Self::Validation(ValidationError::OutsideRoot(path)),
            other => Self::Repo(other),
        }
    }
}

pub type EntryServiceResult<T> = Result<T, EntryServiceError>;

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an entry dated today (local time).
    pub fn create_entry(&self, draft: &EntryDraft) -> EntryServiceResult<Entry> {
        self.create_entry_on(Local::now().date_naive(), draft)
    }

    /// Creates an entry with an explicit creation date.
    pub fn create_entry_on(&self, date: NaiveDate, draft: &EntryDraft) -> EntryServiceResult<Entry> {
        draft.validate()?;
        let slug = slugify(&draft.title);
        let entry = Entry {
            title: draft.title.clone(),
            date,
            tags: draft.tags.clone(),
            body: draft.body.clone(),
            path: self.repo.entry_path(date, &slug)?,
        };

        match self.repo.insert_entry(&entry) {
            Ok(()) => {
                info!(
                    "event=entry_create module=entry status=ok date={} slug={} tags={}",
                    date,
                    slug,
                    entry.tags.len()
                );
                Ok(entry)
            }
            Err(err) => {
                warn!("event=entry_create module=entry status=error date={date} slug={slug} error={err}");
                Err(err.into())
            }
        }
    }

    /// Lazily yields every stored entry in path order.
    pub fn scan_entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.repo.scan_entries()
    }

    /// Collects every stored entry in path order.
    pub fn list_entries(&self) -> Vec<Entry> {
        self.scan_entries().collect()
    }

    /// Collects entries matching `filter`, in path order.
    pub fn list_filtered(&self, filter: &EntryFilter) -> Vec<Entry> {
        self.scan_entries()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    pub fn get_entry(&self, path: &Path) -> EntryServiceResult<Entry> {
        Ok(self.repo.load_entry(path)?)
    }

    /// Rewrites title, body and tags of the entry at `path`.
    pub fn update_entry(&self, path: &Path, draft: &EntryDraft) -> EntryServiceResult<Entry> {
        draft.validate()?;
        let existing = self.repo.load_entry(path)?;
        let entry = Entry {
            title: draft.title.clone(),
            date: existing.date,
            tags: draft.tags.clone(),
            body: draft.body.clone(),
            path: existing.path,
        };
        self.repo.replace_entry(&entry)?;
        info!(
            "event=entry_update module=entry status=ok date={} path={}",
            entry.date,
            entry.path.display()
        );
        Ok(entry)
    }

    /// Removes the entry file and its attachment directory.
    pub fn delete_entry(&self, path: &Path) -> EntryServiceResult<()> {
        match self.repo.remove_entry(path) {
            Ok(()) => {
                info!(
                    "event=entry_delete module=entry status=ok path={}",
                    path.display()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=entry_delete module=entry status=error path={} error={err}",
                    path.display()
                );
                Err(err.into())
            }
        }
    }

    /// Stores uploads in the attachment directory of the entry at `path`.
    /// The directory follows the file name, so a retitled entry keeps using
    /// the directory it was created with. All names are checked before the
    /// first byte is written.
    pub fn attach(
        &self,
        path: &Path,
        uploads: &[AttachmentUpload],
    ) -> EntryServiceResult<Vec<PathBuf>> {
        let names = uploads
            .iter()
            .map(AttachmentUpload::stored_name)
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = Vec::with_capacity(uploads.len());
        for (upload, name) in uploads.iter().zip(names) {
            written.push(self.repo.write_attachment(path, &name, &upload.bytes)?);
        }
        info!(
            "event=entry_attach module=entry status=ok path={} files={}",
            path.display(),
            written.len()
        );
        Ok(written)
    }

    pub fn attachments(&self, entry: &Entry) -> EntryServiceResult<Vec<Attachment>> {
        Ok(self.repo.list_attachments(&entry.path)?)
    }
}

/// Distinct tags across `entries`, sorted for a filter picker.
pub fn collect_tags(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reverses scan order so the most recent day comes first.
pub fn newest_first(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.reverse();
    entries
}
