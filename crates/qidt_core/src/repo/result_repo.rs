//! Structure result repository contracts and filesystem implementation.
//!
//! # Responsibility
//! - Map results to `results/<slug>/data.yaml` (+ `structure.png`).
//! - Decode results written by earlier versions of the notebook.
//!
//! # Invariants
//! - μ, QIDE and the tag are written for readers of the YAML file but are
//!   never trusted on read; they are recomputed from name and energies.
//! - The directory name (slug) is the record key.
//! - Every float is written with a `.` in the mantissa and a signed exponent
//!   (`1.0e+16`, never `1e16`), the only float shape YAML 1.1 readers accept.

use super::files::{io_error, is_plain_component, write_new, write_replace};
use super::{RepoError, RepoResult};
use crate::model::result::{StructureInput, StructureResult};
use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DATA_FILE_NAME: &str = "data.yaml";
pub const IMAGE_FILE_NAME: &str = "structure.png";

static EXPONENT_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([^\s:][^:]*): (-?\d+)(?:\.(\d+))?e(-?)(\d+)$")
        .expect("valid exponent float regex")
});

/// On-disk mapping of one result. Field order is the code-point order of the
/// keys, which is the order existing files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ResultDocument {
    #[serde(rename = "E_molecule", default)]
    e_molecule: f64,
    #[serde(rename = "E_substrate", default)]
    e_substrate: f64,
    #[serde(rename = "E_total", default)]
    e_total: f64,
    #[serde(rename = "HOMO", default)]
    homo: f64,
    #[serde(rename = "LUMO", default)]
    lumo: f64,
    #[serde(rename = "Mulliken最大", default)]
    mulliken_max: f64,
    #[serde(rename = "Mulliken最小", default)]
    mulliken_min: f64,
    #[serde(rename = "QIDE", default)]
    qide: Option<f64>,
    #[serde(rename = "SCFエネルギー", default)]
    scf_energy: f64,
    #[serde(rename = "μ", default)]
    mu: Option<f64>,
    #[serde(rename = "タグ", default)]
    tag: Option<String>,
    #[serde(rename = "メモ", default)]
    notes: Option<String>,
    #[serde(rename = "双極子モーメント", default)]
    dipole_moment: f64,
    #[serde(rename = "構造名")]
    name: String,
}

impl ResultDocument {
    fn from_result(result: &StructureResult) -> Self {
        let input = &result.input;
        Self {
            e_molecule: input.e_molecule,
            e_substrate: input.e_substrate,
            e_total: input.e_total,
            homo: input.homo,
            lumo: input.lumo,
            mulliken_max: input.mulliken_max,
            mulliken_min: input.mulliken_min,
            qide: Some(result.qide()),
            scf_energy: input.scf_energy,
            mu: Some(result.mu()),
            tag: Some(result.tag.as_str().to_string()),
            notes: Some(input.notes.clone()),
            dipole_moment: input.dipole_moment,
            name: input.name.clone(),
        }
    }

    fn into_result(self) -> StructureResult {
        StructureResult::from_input(StructureInput {
            name: self.name,
            scf_energy: self.scf_energy,
            homo: self.homo,
            lumo: self.lumo,
            dipole_moment: self.dipole_moment,
            mulliken_max: self.mulliken_max,
            mulliken_min: self.mulliken_min,
            e_total: self.e_total,
            e_substrate: self.e_substrate,
            e_molecule: self.e_molecule,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

/// Repository interface for structure results.
pub trait ResultRepository {
    /// Directory holding the result with this slug.
    fn result_dir(&self, slug: &str) -> RepoResult<PathBuf>;
    /// Writes `data.yaml` (and `structure.png` when `image` is given).
    /// With `create_only`, an existing `data.yaml` yields `Conflict`.
    fn write_result(
        &self,
        result: &StructureResult,
        image: Option<&[u8]>,
        create_only: bool,
    ) -> RepoResult<PathBuf>;
    /// Reads the result stored under `slug`.
    fn load_result(&self, slug: &str) -> RepoResult<StructureResult>;
    /// Reads every readable result in directory-name order.
    fn list_results(&self) -> RepoResult<Vec<StructureResult>>;
    /// Removes the whole result directory.
    fn remove_result(&self, slug: &str) -> RepoResult<()>;
}

/// Result repository rooted at a `results/` directory.
#[derive(Debug, Clone)]
pub struct FsResultRepository {
    root: PathBuf,
}

impl FsResultRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResultRepository for FsResultRepository {
    fn result_dir(&self, slug: &str) -> RepoResult<PathBuf> {
        if !is_plain_component(slug) {
            return Err(RepoError::InvalidPath(PathBuf::from(slug)));
        }
        Ok(self.root.join(slug))
    }

    fn write_result(
        &self,
        result: &StructureResult,
        image: Option<&[u8]>,
        create_only: bool,
    ) -> RepoResult<PathBuf> {
        let dir = self.result_dir(&result.input.slug())?;
        let data_path = dir.join(DATA_FILE_NAME);
        let yaml = render_document(&ResultDocument::from_result(result)).map_err(|err| {
            RepoError::Parse {
                path: data_path.clone(),
                message: err.to_string(),
            }
        })?;

        if create_only {
            write_new(&data_path, yaml.as_bytes())?;
        } else {
            write_replace(&data_path, yaml.as_bytes())?;
        }
        if let Some(bytes) = image {
            write_replace(&dir.join(IMAGE_FILE_NAME), bytes)?;
        }
        Ok(data_path)
    }

    fn load_result(&self, slug: &str) -> RepoResult<StructureResult> {
        let dir = self.result_dir(slug)?;
        read_result_dir(&dir)
    }

    fn list_results(&self) -> RepoResult<Vec<StructureResult>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for item in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let item = item.map_err(|err| RepoError::Io {
                path: self.root.clone(),
                source: err.into(),
            })?;
            if !item.file_type().is_dir() || !item.path().join(DATA_FILE_NAME).is_file() {
                continue;
            }
            match read_result_dir(item.path()) {
                Ok(result) => results.push(result),
                Err(err) => warn!("event=result_scan module=repo status=skipped error={err}"),
            }
        }
        Ok(results)
    }

    fn remove_result(&self, slug: &str) -> RepoResult<()> {
        let dir = self.result_dir(slug)?;
        if !dir.is_dir() {
            return Err(RepoError::NotFound(dir));
        }
        fs::remove_dir_all(&dir).map_err(|err| io_error(&dir, err))
    }
}

fn render_document(document: &ResultDocument) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document).map(|yaml| yaml11_floats(&yaml))
}

/// Rewrites top-level `key: 1e16` / `key: 1.5e-7` values to `1.0e+16` /
/// `1.5e-7`. Strings that look like numbers are already quoted by
/// `serde_yaml`, so only float scalars match.
fn yaml11_floats(yaml: &str) -> String {
    EXPONENT_FLOAT_RE
        .replace_all(yaml, |caps: &Captures<'_>| {
            let fraction = caps.get(3).map_or("0", |m| m.as_str());
            let sign = if caps[4].is_empty() { "+" } else { "-" };
            format!("{}: {}.{}e{}{}", &caps[1], &caps[2], fraction, sign, &caps[5])
        })
        .into_owned()
}

fn read_result_dir(dir: &Path) -> RepoResult<StructureResult> {
    let data_path = dir.join(DATA_FILE_NAME);
    let text = fs::read_to_string(&data_path).map_err(|err| io_error(&data_path, err))?;
    let document =
        serde_yaml::from_str::<ResultDocument>(&text).map_err(|err| RepoError::Parse {
            path: data_path.clone(),
            message: err.to_string(),
        })?;

    let mut result = document.into_result();
    let image_path = dir.join(IMAGE_FILE_NAME);
    if image_path.is_file() {
        result.image_path = Some(image_path);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::StructureTag;

    #[test]
    fn document_keys_are_written_in_code_point_order() {
        let result = StructureResult::from_input(StructureInput {
            homo: -0.2,
            lumo: -0.1,
            notes: "memo".to_string(),
            ..StructureInput::named("MMA Trimer")
        });
        let yaml = render_document(&ResultDocument::from_result(&result)).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter_map(|line| line.split_once(':').map(|(key, _)| key))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 14);
        assert!(yaml.contains("タグ: Trimer"));
    }

    #[test]
    fn exponent_floats_get_a_fraction_and_signed_exponent() {
        let yaml = "E_total: 1e16\nHOMO: -1.5e-7\nLUMO: -0.25\nメモ: '1e16'\nμ: 2.5e300\n";
        assert_eq!(
            yaml11_floats(yaml),
            "E_total: 1.0e+16\nHOMO: -1.5e-7\nLUMO: -0.25\nメモ: '1e16'\nμ: 2.5e+300\n"
        );
    }

    #[test]
    fn large_values_are_written_in_a_float_shape_and_read_back() {
        let result = StructureResult::from_input(StructureInput {
            dipole_moment: 1e16,
            notes: "1e16".to_string(),
            ..StructureInput::named("Big")
        });
        let yaml = render_document(&ResultDocument::from_result(&result)).unwrap();
        assert!(yaml.contains("双極子モーメント: 1.0e+16\n"), "{yaml}");
        assert!(!yaml.contains(": 1e16"), "{yaml}");

        let reread = serde_yaml::from_str::<ResultDocument>(&yaml).unwrap().into_result();
        assert_eq!(reread.input.dipole_moment, 1e16);
        assert_eq!(reread.input.notes, "1e16");
    }

    #[test]
    fn stale_derived_values_are_ignored_on_read() {
        let yaml = "E_molecule: -40.0\nE_substrate: -100.0\nE_total: -150.0\nHOMO: -0.3\nLUMO: -0.1\n\
                    QIDE: 999.0\nμ: 999.0\nタグ: Other\n構造名: MMA Dimer\n";
        let result = serde_yaml::from_str::<ResultDocument>(yaml)
            .unwrap()
            .into_result();
        assert_eq!(result.qide(), -150.0 - -100.0 - -40.0);
        assert_eq!(result.mu(), -(-0.3 + -0.1) / 2.0);
        assert_eq!(result.tag, StructureTag::Dimer);
        assert_eq!(result.input.notes, "");
    }

    #[test]
    fn escaped_unicode_keys_and_integer_values_decode() {
        let yaml = "HOMO: 0\n\"\\u69CB\\u9020\\u540D\": Bulk Slab\n\"\\u30E1\\u30E2\": ''\n";
        let document = serde_yaml::from_str::<ResultDocument>(yaml).unwrap();
        assert_eq!(document.name, "Bulk Slab");
        assert_eq!(document.homo, 0.0);
        assert_eq!(document.notes.as_deref(), Some(""));
    }
}
