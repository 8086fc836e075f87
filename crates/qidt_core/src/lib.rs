//! Core domain logic for the QIDT lab notebook.
//! This crate is the single source of truth for storage layout and
//! derived chemistry values.

pub mod chem;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod spectrum;
pub mod table;

pub use chem::classify::classify;
pub use chem::metrics::{mu, qide};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::entry::{
    parse_tags, Attachment, AttachmentKind, AttachmentUpload, Entry, EntryDraft, EntryFilter,
};
pub use model::result::{StructureInput, StructureResult, StructureTag};
pub use model::{slugify, ValidationError};
pub use repo::entry_repo::{EntryRepository, FsEntryRepository};
pub use repo::result_repo::{FsResultRepository, ResultRepository};
pub use repo::{RepoError, RepoResult};
pub use service::entry_service::{
    collect_tags, newest_first, EntryService, EntryServiceError, EntryServiceResult,
};
pub use service::result_service::{ResultService, ResultServiceError, ResultServiceResult};
pub use session::{AuthGate, AuthState, Session, SessionError};
pub use spectrum::{smooth, smooth_csv, Peak, SpectrumCurve, SpectrumError};
pub use table::{NumericColumn, TableError};

/// Entry service over the filesystem store configured by `config`.
pub fn open_entry_service(config: &AppConfig) -> EntryService<FsEntryRepository> {
    EntryService::new(FsEntryRepository::new(config.entries_dir()))
}

/// Result service over the filesystem store configured by `config`.
pub fn open_result_service(config: &AppConfig) -> ResultService<FsResultRepository> {
    ResultService::new(FsResultRepository::new(config.results_dir()))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
