//! Notebook entry model.
//!
//! # Responsibility
//! - Define the parsed note entry and its write-side draft.
//! - Parse comma-separated tag input and match list filters.
//! - Classify attachments by extension.
//!
//! # Invariants
//! - `title` and `body` are non-blank for every entry written by the store.
//! - `date` is fixed at creation; updates never change it.
//! - `tags` keep first-seen order with duplicates removed.

use super::{check_slug, ValidationError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Upload extensions accepted for entry attachments (lowercase).
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "csv", "out", "xyz", "txt"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One parsed note file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    /// Markdown body exactly as written by the user.
    pub body: String,
    /// Location of the `.md` file; the entry's identity.
    pub path: PathBuf,
}

impl Entry {
    /// Sibling directory holding this entry's attachments.
    pub fn attachment_dir(&self) -> PathBuf {
        attachment_dir_for(&self.path)
    }

    /// Tags joined for display, e.g. `MMA, QIDT`.
    pub fn tag_display(&self) -> String {
        self.tags.join(", ")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }
}

/// Attachment directory for an entry file: same parent, extension stripped.
pub fn attachment_dir_for(entry_path: &Path) -> PathBuf {
    entry_path.with_extension("")
}

/// Write-side entry input (create and update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags: dedup_tags(tags),
        }
    }

    /// Builds a draft from the form shape: tags as one comma-separated string.
    pub fn from_form(title: impl Into<String>, body: impl Into<String>, tags: &str) -> Self {
        Self::new(title, body, parse_tags(tags))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        check_slug(&self.title)
    }
}

/// Splits `MMA, MAA,, QIDT` into `["MMA", "MAA", "QIDT"]`.
pub fn parse_tags(input: &str) -> Vec<String> {
    dedup_tags(
        input
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// List filter; `None` on either axis means "no filter". Axes combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub tag: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let tag_ok = self.tag.as_deref().map_or(true, |tag| entry.has_tag(tag));
        let date_ok = self.date.map_or(true, |date| entry.date == date);
        tag_ok && date_ok
    }
}

/// Rendering hint for attachment files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Text,
}

impl AttachmentKind {
    pub fn from_file_name(name: &str) -> Self {
        match extension_of(name) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Self::Image,
            _ => Self::Text,
        }
    }
}

/// Stored attachment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub path: PathBuf,
    pub kind: AttachmentKind,
}

/// Uploaded file as received from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Final path component of the upload name, checked against the accepted
    /// extension list.
    pub fn stored_name(&self) -> Result<String, ValidationError> {
        let file_name = Path::new(self.name.trim())
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .ok_or_else(|| ValidationError::InvalidFileName(self.name.clone()))?;

        match extension_of(file_name) {
            Some(ext) if ATTACHMENT_EXTENSIONS.contains(&ext.as_str()) => {
                Ok(file_name.to_string())
            }
            _ => Err(ValidationError::UnsupportedAttachment(file_name.to_string())),
        }
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tags: &[&str], date: NaiveDate) -> Entry {
        Entry {
            title: "t".to_string(),
            date,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            body: "b".to_string(),
            path: PathBuf::from("entries/2024-01-01/t.md"),
        }
    }

    #[test]
    fn parse_tags_trims_drops_blanks_and_dedups_in_order() {
        assert_eq!(
            parse_tags(" MMA, MAA,,QIDT , MMA ,  "),
            vec!["MMA".to_string(), "MAA".to_string(), "QIDT".to_string()]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn draft_requires_title_and_body() {
        assert_eq!(
            EntryDraft::from_form("  ", "body", "").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            EntryDraft::from_form("title", "\n\t", "").validate(),
            Err(ValidationError::EmptyBody)
        );
        assert!(EntryDraft::from_form("title", "body", "x").validate().is_ok());
    }

    #[test]
    fn filter_combines_tag_and_date_with_and() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let item = entry(&["MMA", "ORCA"], day);

        assert!(EntryFilter::default().matches(&item));
        let by_tag = EntryFilter {
            tag: Some("ORCA".to_string()),
            date: None,
        };
        assert!(by_tag.matches(&item));
        let wrong_day = EntryFilter {
            tag: Some("ORCA".to_string()),
            date: Some(other_day),
        };
        assert!(!wrong_day.matches(&item));
        let case_differs = EntryFilter {
            tag: Some("orca".to_string()),
            date: Some(day),
        };
        assert!(!case_differs.matches(&item));
    }

    #[test]
    fn attachment_dir_strips_md_extension() {
        let item = entry(&[], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(item.attachment_dir(), PathBuf::from("entries/2024-01-01/t"));
    }

    #[test]
    fn stored_name_keeps_last_component_and_checks_extension() {
        let upload = AttachmentUpload::new("../../etc/plot.PNG", vec![1]);
        assert_eq!(upload.stored_name().unwrap(), "plot.PNG");
        assert_eq!(AttachmentKind::from_file_name("plot.PNG"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_file_name("run.out"), AttachmentKind::Text);

        let exe = AttachmentUpload::new("tool.exe", vec![]);
        assert!(matches!(
            exe.stored_name(),
            Err(ValidationError::UnsupportedAttachment(_))
        ));
        let dots = AttachmentUpload::new("..", vec![]);
        assert!(matches!(
            dots.stored_name(),
            Err(ValidationError::InvalidFileName(_))
        ));
    }
}
