//! Structure result use-case service.
//!
//! # Responsibility
//! - Validate form input, classify the structure and persist it.
//! - Separate create (must be new) from save (overwrite, used for edits).
//!
//! # Invariants
//! - Callers cannot supply μ or QIDE; both follow from the stored energies.
//! - Results are addressed by structure name; the slug is the directory.

use crate::model::result::{StructureInput, StructureResult};
use crate::model::{slugify, ValidationError};
use crate::repo::result_repo::{ResultRepository, IMAGE_FILE_NAME};
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for result use-cases.
#[derive(Debug)]
pub enum ResultServiceError {
    Validation(ValidationError),
    /// A result with the same slug already exists.
    Conflict(String),
    ResultNotFound(String),
    Repo(RepoError),
}

impl Display for ResultServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(name) => write!(f, "structure already exists: `{name}`"),
            Self::ResultNotFound(name) => write!(f, "structure not found: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ResultServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ResultServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ResultServiceResult<T> = Result<T, ResultServiceError>;

/// Result service facade over repository implementations.
pub struct ResultService<R: ResultRepository> {
    repo: R,
}

impl<R: ResultRepository> ResultService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new structure; fails with `Conflict` if the name is taken.
    pub fn create_result(
        &self,
        input: StructureInput,
        image: Option<&[u8]>,
    ) -> ResultServiceResult<StructureResult> {
        self.write(input, image, true)
    }

    /// Stores a structure, replacing any existing one with the same name.
    /// An existing image is kept when `image` is `None`.
    pub fn save_result(
        &self,
        input: StructureInput,
        image: Option<&[u8]>,
    ) -> ResultServiceResult<StructureResult> {
        self.write(input, image, false)
    }

    pub fn get_result(&self, name: &str) -> ResultServiceResult<StructureResult> {
        self.repo
            .load_result(&slugify(name))
            .map_err(|err| map_repo_error(name, err))
    }

    /// Every readable result, ordered by directory name.
    pub fn list_results(&self) -> ResultServiceResult<Vec<StructureResult>> {
        self.repo
            .list_results()
            .map_err(|err| map_repo_error("", err))
    }

    pub fn delete_result(&self, name: &str) -> ResultServiceResult<()> {
        match self.repo.remove_result(&slugify(name)) {
            Ok(()) => {
                info!(
                    "event=result_delete module=result status=ok slug={}",
                    slugify(name)
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=result_delete module=result status=error slug={} error={err}",
                    slugify(name)
                );
                Err(map_repo_error(name, err))
            }
        }
    }

    fn write(
        &self,
        input: StructureInput,
        image: Option<&[u8]>,
        create_only: bool,
    ) -> ResultServiceResult<StructureResult> {
        input.validate()?;
        let name = input.name.clone();
        let mut result = StructureResult::from_input(input);

        let data_path = self
            .repo
            .write_result(&result, image, create_only)
            .map_err(|err| {
                warn!(
                    "event=result_save module=result status=error slug={} error={err}",
                    result.input.slug()
                );
                map_repo_error(&name, err)
            })?;

        let image_path = data_path.with_file_name(IMAGE_FILE_NAME);
        if image_path.is_file() {
            result.image_path = Some(image_path);
        }
        info!(
            "event=result_save module=result status=ok slug={} tag={} create_only={}",
            result.input.slug(),
            result.tag,
            create_only
        );
        Ok(result)
    }
}

fn map_repo_error(name: &str, err: RepoError) -> ResultServiceError {
    match err {
        RepoError::Conflict(_) => ResultServiceError::Conflict(name.to_string()),
        RepoError::NotFound(_) => ResultServiceError::ResultNotFound(name.to_string()),
        RepoError::InvalidPath(_) => {
            ResultServiceError::Validation(ValidationError::InvalidName(name.to_string()))
        }
        other => ResultServiceError::Repo(other),
    }
}
