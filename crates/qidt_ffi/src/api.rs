//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose notebook, result-table and IR use-cases to Dart via FRB.
//! - Carry the session explicitly in an opaque [`AppContext`].
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every data operation checks the session first; a locked session gets an
//!   `ok=false` envelope and touches nothing on disk.
//! - Failures are reported as envelopes with a readable `message`.

use chrono::NaiveDate;
use log::{info, warn};
use qidt_core::spectrum::{DEFAULT_SIGMA, SIGMA_RANGE};
use qidt_core::table::{self, EXPORT_FILE_NAME};
use qidt_core::{
    collect_tags, core_version as core_version_inner, init_from_config,
    init_logging as init_logging_inner, newest_first, open_entry_service, open_result_service,
    ping as ping_inner, smooth_csv, AppConfig, Attachment, AttachmentKind, AttachmentUpload,
    AuthGate, AuthState, Entry, EntryDraft, EntryFilter, NumericColumn, Session, StructureInput,
    StructureResult,
};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

const SPECTRUM_EXPORT_STEM: &str = "spectrum";
static APP_CONFIG: OnceLock<Result<AppConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Axis choices for result charts, in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn numeric_columns() -> Vec<String> {
    NumericColumn::ALL
        .iter()
        .map(|column| column.label().to_string())
        .collect()
}

/// Per-session handle: resolved configuration plus authentication state.
#[flutter_rust_bridge::frb(opaque)]
pub struct AppContext {
    config: AppConfig,
    gate: AuthGate,
    session: Mutex<Session>,
}

/// Result of opening a context.
pub struct ContextOpenResponse {
    pub ok: bool,
    pub context: Option<AppContext>,
    pub message: String,
}

/// Opens a locked session over the process configuration.
///
/// Configuration is read from the environment once per process. When
/// `QIDT_LOG_DIR` is set, logging is started as well.
#[flutter_rust_bridge::frb(sync)]
pub fn app_context_open() -> ContextOpenResponse {
    let opened = resolve_config().and_then(|config| {
        init_from_config(&config)?;
        Ok(config)
    });
    let config = match opened {
        Ok(config) => config,
        Err(err) => {
            warn!("event=app_context_open module=ffi status=error error={err}");
            return ContextOpenResponse {
                ok: false,
                context: None,
                message: format!("app_context_open failed: {err}"),
            };
        }
    };
    info!(
        "event=app_context_open module=ffi status=ok data_dir={}",
        config.data_dir.display()
    );
    ContextOpenResponse {
        ok: true,
        context: Some(AppContext::new(config)),
        message: "Session opened.".to_string(),
    }
}

fn resolve_config() -> Result<AppConfig, String> {
    APP_CONFIG
        .get_or_init(|| AppConfig::from_env().map_err(|err| err.to_string()))
        .clone()
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Path or name of the affected record, when there is one.
    pub target: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, target: Option<String>) -> Self {
        Self {
            ok: true,
            target,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            target: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub authenticated: bool,
    pub message: String,
}

/// One note as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub path: String,
    pub title: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub tags: Vec<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    pub ok: bool,
    /// Newest first.
    pub items: Vec<EntryItem>,
    /// Distinct tags over all entries, for the filter picker.
    pub tags: Vec<String>,
    pub message: String,
}

/// Uploaded file handed over by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentItem {
    pub name: String,
    pub path: String,
    pub is_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentListResponse {
    pub ok: bool,
    pub items: Vec<AttachmentItem>,
    pub message: String,
}

/// Structure form values. μ and QIDE are not part of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureForm {
    pub name: String,
    pub scf_energy: f64,
    pub homo: f64,
    pub lumo: f64,
    pub dipole_moment: f64,
    pub mulliken_max: f64,
    pub mulliken_min: f64,
    pub e_total: f64,
    pub e_substrate: f64,
    pub e_molecule: f64,
    pub notes: String,
}

/// One structure result with its derived values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub name: String,
    pub tag: String,
    pub scf_energy: f64,
    pub homo: f64,
    pub lumo: f64,
    pub mu: f64,
    pub dipole_moment: f64,
    pub mulliken_max: f64,
    pub mulliken_min: f64,
    pub e_total: f64,
    pub e_substrate: f64,
    pub e_molecule: f64,
    pub qide: f64,
    pub notes: String,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultActionResponse {
    pub ok: bool,
    pub item: Option<ResultItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultListResponse {
    pub ok: bool,
    pub items: Vec<ResultItem>,
    pub message: String,
}

/// Downloadable file produced in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub message: String,
}

impl FileExportResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            file_name: String::new(),
            bytes: Vec::new(),
            message: message.into(),
        }
    }
}

/// Points of one tag group; `labels`, `xs` and `ys` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub tag: String,
    pub labels: Vec<String>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterResponse {
    pub ok: bool,
    pub series: Vec<ScatterSeries>,
    pub message: String,
}

/// Input for the external k-means call; `xs` and `ys` are parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInputResponse {
    pub ok: bool,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub cluster_count: u32,
    pub message: String,
}

impl ClusterInputResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            xs: Vec::new(),
            ys: Vec::new(),
            cluster_count: 0,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumResponse {
    pub ok: bool,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// σ actually applied.
    pub sigma: f64,
    pub message: String,
}

impl AppContext {
    /// Locked session over an explicit configuration.
    #[flutter_rust_bridge::frb(ignore)]
    pub fn new(config: AppConfig) -> Self {
        Self {
            gate: AuthGate::from_config(&config),
            config,
            session: Mutex::new(Session::new()),
        }
    }

    /// Checks the passphrase and unlocks the session on a match.
    #[flutter_rust_bridge::frb(sync)]
    pub fn auth_submit(&self, passphrase: String) -> AuthResponse {
        let mut session = match self.session.lock() {
            Ok(session) => session,
            Err(_) => {
                return AuthResponse {
                    authenticated: false,
                    message: "auth_submit failed: session state unavailable".to_string(),
                }
            }
        };
        match session.submit(&self.gate, &passphrase) {
            AuthState::Authenticated => AuthResponse {
                authenticated: true,
                message: "Authenticated.".to_string(),
            },
            _ => AuthResponse {
                authenticated: false,
                message: "Passphrase is incorrect.".to_string(),
            },
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn auth_lock(&self) {
        if let Ok(mut session) = self.session.lock() {
            session.lock();
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn is_authenticated(&self) -> bool {
        self.session
            .lock()
            .map(|session| session.is_authenticated())
            .unwrap_or(false)
    }

    /// Creates a note dated today. `tags` is comma-separated.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_create(&self, title: String, body: String, tags: String) -> ActionResponse {
        if let Err(err) = self.require() {
            return ActionResponse::failure(format!("entry_create failed: {err}"));
        }
        let draft = EntryDraft::from_form(title.trim(), body, &tags);
        match open_entry_service(&self.config).create_entry(&draft) {
            Ok(entry) => ActionResponse::success("Entry saved.", Some(path_string(&entry.path))),
            Err(err) => ActionResponse::failure(format!("entry_create failed: {err}")),
        }
    }

    /// Lists notes newest first. `tag` and `date` (`YYYY-MM-DD`) narrow the
    /// list; `None` or blank means no filter on that axis.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_list(&self, tag: Option<String>, date: Option<String>) -> EntryListResponse {
        let failure = |message: String| EntryListResponse {
            ok: false,
            items: Vec::new(),
            tags: Vec::new(),
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("entry_list failed: {err}"));
        }
        let date = match parse_date_filter(date) {
            Ok(date) => date,
            Err(err) => return failure(format!("entry_list failed: {err}")),
        };
        let filter = EntryFilter {
            tag: tag.map(|tag| tag.trim().to_string()).filter(|tag| !tag.is_empty()),
            date,
        };

        let all = open_entry_service(&self.config).list_entries();
        let tags = collect_tags(&all);
        let matching = all
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect::<Vec<_>>();
        let items = newest_first(matching)
            .into_iter()
            .map(to_entry_item)
            .collect::<Vec<_>>();
        let message = if items.is_empty() {
            "No entries.".to_string()
        } else {
            format!("Found {} entr(ies).", items.len())
        };
        EntryListResponse {
            ok: true,
            items,
            tags,
            message,
        }
    }

    /// Rewrites the note at `path`, keeping its date.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_update(
        &self,
        path: String,
        title: String,
        body: String,
        tags: String,
    ) -> ActionResponse {
        if let Err(err) = self.require() {
            return ActionResponse::failure(format!("entry_update failed: {err}"));
        }
        let draft = EntryDraft::from_form(title.trim(), body, &tags);
        match open_entry_service(&self.config).update_entry(Path::new(&path), &draft) {
            Ok(entry) => ActionResponse::success("Entry updated.", Some(path_string(&entry.path))),
            Err(err) => ActionResponse::failure(format!("entry_update failed: {err}")),
        }
    }

    /// Deletes the note at `path` with its attachments.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_delete(&self, path: String) -> ActionResponse {
        if let Err(err) = self.require() {
            return ActionResponse::failure(format!("entry_delete failed: {err}"));
        }
        match open_entry_service(&self.config).delete_entry(Path::new(&path)) {
            Ok(()) => ActionResponse::success("Entry deleted.", Some(path)),
            Err(err) => ActionResponse::failure(format!("entry_delete failed: {err}")),
        }
    }

    /// Stores uploads next to the note at `path`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_attach(&self, path: String, files: Vec<UploadFile>) -> AttachmentListResponse {
        let failure = |message: String| AttachmentListResponse {
            ok: false,
            items: Vec::new(),
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("entry_attach failed: {err}"));
        }
        let uploads = files
            .into_iter()
            .map(|file| AttachmentUpload::new(file.name, file.bytes))
            .collect::<Vec<_>>();

        match open_entry_service(&self.config).attach(Path::new(&path), &uploads) {
            Ok(paths) => {
                let items = paths
                    .iter()
                    .map(|path| {
                        let name = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        AttachmentItem {
                            is_image: AttachmentKind::from_file_name(&name)
                                == AttachmentKind::Image,
                            name,
                            path: path_string(path),
                        }
                    })
                    .collect::<Vec<_>>();
                AttachmentListResponse {
                    ok: true,
                    message: format!("Saved {} file(s).", items.len()),
                    items,
                }
            }
            Err(err) => failure(format!("entry_attach failed: {err}")),
        }
    }

    /// Attachments of the note at `path`, sorted by name.
    #[flutter_rust_bridge::frb(sync)]
    pub fn entry_attachments(&self, path: String) -> AttachmentListResponse {
        let failure = |message: String| AttachmentListResponse {
            ok: false,
            items: Vec::new(),
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("entry_attachments failed: {err}"));
        }
        let service = open_entry_service(&self.config);
        let listed = service
            .get_entry(Path::new(&path))
            .and_then(|entry| service.attachments(&entry));
        match listed {
            Ok(attachments) => AttachmentListResponse {
                ok: true,
                message: format!("Found {} file(s).", attachments.len()),
                items: attachments.into_iter().map(to_attachment_item).collect(),
            },
            Err(err) => failure(format!("entry_attachments failed: {err}")),
        }
    }

    /// Saves a new structure; an existing name is rejected.
    #[flutter_rust_bridge::frb(sync)]
    pub fn result_create(
        &self,
        form: StructureForm,
        image: Option<Vec<u8>>,
    ) -> ResultActionResponse {
        if let Err(err) = self.require() {
            return result_failure(format!("result_create failed: {err}"));
        }
        match open_result_service(&self.config).create_result(to_input(form), image.as_deref()) {
            Ok(result) => ResultActionResponse {
                ok: true,
                item: Some(to_result_item(&result)),
                message: "Structure saved.".to_string(),
            },
            Err(err) => result_failure(format!("result_create failed: {err}")),
        }
    }

    /// Saves a structure, replacing the one with the same name. The stored
    /// image is kept when `image` is `None`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn result_update(
        &self,
        form: StructureForm,
        image: Option<Vec<u8>>,
    ) -> ResultActionResponse {
        if let Err(err) = self.require() {
            return result_failure(format!("result_update failed: {err}"));
        }
        match open_result_service(&self.config).save_result(to_input(form), image.as_deref()) {
            Ok(result) => ResultActionResponse {
                ok: true,
                item: Some(to_result_item(&result)),
                message: "Structure updated.".to_string(),
            },
            Err(err) => result_failure(format!("result_update failed: {err}")),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn result_list(&self) -> ResultListResponse {
        let failure = |message: String| ResultListResponse {
            ok: false,
            items: Vec::new(),
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("result_list failed: {err}"));
        }
        match open_result_service(&self.config).list_results() {
            Ok(results) => ResultListResponse {
                ok: true,
                message: format!("Found {} structure(s).", results.len()),
                items: results.iter().map(to_result_item).collect(),
            },
            Err(err) => failure(format!("result_list failed: {err}")),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn result_delete(&self, name: String) -> ActionResponse {
        if let Err(err) = self.require() {
            return ActionResponse::failure(format!("result_delete failed: {err}"));
        }
        match open_result_service(&self.config).delete_result(&name) {
            Ok(()) => ActionResponse::success("Structure deleted.", Some(name)),
            Err(err) => ActionResponse::failure(format!("result_delete failed: {err}")),
        }
    }

    /// All results as a UTF-8 CSV download.
    #[flutter_rust_bridge::frb(sync)]
    pub fn result_export_csv(&self) -> FileExportResponse {
        if let Err(err) = self.require() {
            return FileExportResponse::failure(format!("result_export_csv failed: {err}"));
        }
        let exported = open_result_service(&self.config)
            .list_results()
            .map_err(|err| err.to_string())
            .and_then(|results| table::export_csv(&results).map_err(|err| err.to_string()));
        match exported {
            Ok(bytes) => FileExportResponse {
                ok: true,
                file_name: EXPORT_FILE_NAME.to_string(),
                bytes,
                message: "Export ready.".to_string(),
            },
            Err(err) => FileExportResponse::failure(format!("result_export_csv failed: {err}")),
        }
    }

    /// Tag-grouped `(x, y)` series for the chosen column labels.
    #[flutter_rust_bridge::frb(sync)]
    pub fn result_scatter(&self, x: String, y: String) -> ScatterResponse {
        let failure = |message: String| ScatterResponse {
            ok: false,
            series: Vec::new(),
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("result_scatter failed: {err}"));
        }
        let (x, y) = match axis_pair(&x, &y) {
            Ok(pair) => pair,
            Err(err) => return failure(format!("result_scatter failed: {err}")),
        };
        match open_result_service(&self.config).list_results() {
            Ok(results) => {
                let series = table::scatter_series(&results, x, y)
                    .into_iter()
                    .map(|group| ScatterSeries {
                        tag: group.tag.to_string(),
                        labels: group.points.iter().map(|p| p.label.clone()).collect(),
                        xs: group.points.iter().map(|p| p.x).collect(),
                        ys: group.points.iter().map(|p| p.y).collect(),
                    })
                    .collect::<Vec<_>>();
                ScatterResponse {
                    ok: true,
                    message: format!("{} group(s).", series.len()),
                    series,
                }
            }
            Err(err) => failure(format!("result_scatter failed: {err}")),
        }
    }

    /// Feature rows and a checked cluster count for the k-means collaborator.
    #[flutter_rust_bridge::frb(sync)]
    pub fn result_cluster_input(
        &self,
        x: String,
        y: String,
        cluster_count: u32,
    ) -> ClusterInputResponse {
        if let Err(err) = self.require() {
            return ClusterInputResponse::failure(format!("result_cluster_input failed: {err}"));
        }
        let (x, y) = match axis_pair(&x, &y) {
            Ok(pair) => pair,
            Err(err) => {
                return ClusterInputResponse::failure(format!("result_cluster_input failed: {err}"))
            }
        };
        let results = match open_result_service(&self.config).list_results() {
            Ok(results) => results,
            Err(err) => {
                return ClusterInputResponse::failure(format!("result_cluster_input failed: {err}"))
            }
        };
        let rows = table::feature_matrix(&results, x, y);
        match table::validate_cluster_count(cluster_count as usize, rows.len()) {
            Ok(k) => ClusterInputResponse {
                ok: true,
                xs: rows.iter().map(|row| row[0]).collect(),
                ys: rows.iter().map(|row| row[1]).collect(),
                cluster_count: k as u32,
                message: format!("{} point(s).", rows.len()),
            },
            Err(err) => ClusterInputResponse::failure(format!("result_cluster_input failed: {err}")),
        }
    }

    /// Smooths a headerless `wavenumber,intensity` CSV. `sigma=None` uses the
    /// default width; values are clamped to the offered range.
    #[flutter_rust_bridge::frb(sync)]
    pub fn ir_smooth(&self, csv: Vec<u8>, sigma: Option<f64>) -> SpectrumResponse {
        let sigma = effective_sigma(sigma);
        let failure = |message: String| SpectrumResponse {
            ok: false,
            xs: Vec::new(),
            ys: Vec::new(),
            sigma,
            message,
        };
        if let Err(err) = self.require() {
            return failure(format!("ir_smooth failed: {err}"));
        }
        match smooth_csv(&csv, sigma) {
            Ok(curve) => SpectrumResponse {
                ok: true,
                xs: curve.x,
                ys: curve.y,
                sigma,
                message: "Spectrum smoothed.".to_string(),
            },
            Err(err) => failure(format!("ir_smooth failed: {err}")),
        }
    }

    /// Smoothed curve as a two-column CSV download named `<name>.csv`
    /// (`spectrum.csv` when `name` is blank).
    #[flutter_rust_bridge::frb(sync)]
    pub fn ir_export_csv(
        &self,
        csv: Vec<u8>,
        sigma: Option<f64>,
        name: Option<String>,
    ) -> FileExportResponse {
        if let Err(err) = self.require() {
            return FileExportResponse::failure(format!("ir_export_csv failed: {err}"));
        }
        let exported = smooth_csv(&csv, effective_sigma(sigma)).and_then(|curve| curve.to_csv());
        match exported {
            Ok(bytes) => FileExportResponse {
                ok: true,
                file_name: spectrum_file_name(name.as_deref()),
                bytes,
                message: "Export ready.".to_string(),
            },
            Err(err) => FileExportResponse::failure(format!("ir_export_csv failed: {err}")),
        }
    }

    fn require(&self) -> Result<(), String> {
        let session = self
            .session
            .lock()
            .map_err(|_| "session state unavailable".to_string())?;
        session.require().map_err(|err| err.to_string())
    }
}

fn result_failure(message: String) -> ResultActionResponse {
    ResultActionResponse {
        ok: false,
        item: None,
        message,
    }
}

fn effective_sigma(sigma: Option<f64>) -> f64 {
    match sigma {
        Some(value) if value.is_finite() => value.clamp(SIGMA_RANGE.0, SIGMA_RANGE.1),
        _ => DEFAULT_SIGMA,
    }
}

fn spectrum_file_name(name: Option<&str>) -> String {
    let stem = name
        .map(str::trim)
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(SPECTRUM_EXPORT_STEM);
    format!("{stem}.csv")
}

fn axis_pair(x: &str, y: &str) -> Result<(NumericColumn, NumericColumn), String> {
    let x = NumericColumn::from_label(x.trim()).map_err(|err| err.to_string())?;
    let y = NumericColumn::from_label(y.trim()).map_err(|err| err.to_string())?;
    Ok((x, y))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{raw}`: {err}"))
}

fn parse_date_filter(raw: Option<String>) -> Result<Option<NaiveDate>, String> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse_date(&value).map(Some),
        _ => Ok(None),
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn to_entry_item(entry: Entry) -> EntryItem {
    EntryItem {
        path: path_string(&entry.path),
        title: entry.title,
        date: entry.date.format("%Y-%m-%d").to_string(),
        tags: entry.tags,
        body: entry.body,
    }
}

fn to_attachment_item(attachment: Attachment) -> AttachmentItem {
    AttachmentItem {
        is_image: attachment.kind == AttachmentKind::Image,
        path: path_string(&attachment.path),
        name: attachment.name,
    }
}

fn to_input(form: StructureForm) -> StructureInput {
    StructureInput {
        name: form.name.trim().to_string(),
        scf_energy: form.scf_energy,
        homo: form.homo,
        lumo: form.lumo,
        dipole_moment: form.dipole_moment,
        mulliken_max: form.mulliken_max,
        mulliken_min: form.mulliken_min,
        e_total: form.e_total,
        e_substrate: form.e_substrate,
        e_molecule: form.e_molecule,
        notes: form.notes,
    }
}

fn to_result_item(result: &StructureResult) -> ResultItem {
    let input = &result.input;
    ResultItem {
        name: input.name.clone(),
        tag: result.tag.to_string(),
        scf_energy: input.scf_energy,
        homo: input.homo,
        lumo: input.lumo,
        mu: result.mu(),
        dipole_moment: input.dipole_moment,
        mulliken_max: input.mulliken_max,
        mulliken_min: input.mulliken_min,
        e_total: input.e_total,
        e_substrate: input.e_substrate,
        e_molecule: input.e_molecule,
        qide: result.qide(),
        notes: input.notes.clone(),
        image_path: result.image_path.as_deref().map(path_string),
    }
}
