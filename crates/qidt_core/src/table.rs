//! Tabular views over structure results.
//!
//! Flattens results into display rows, exports them as CSV and prepares the
//! plain numeric series consumed by the charting and clustering front ends.

use crate::model::result::{StructureResult, StructureTag};
use csv::WriterBuilder;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default download name for the table export.
pub const EXPORT_FILE_NAME: &str = "qidt_structures.csv";

/// Display and export column order.
pub const DISPLAY_COLUMNS: [&str; 14] = [
    "構造名",
    "タグ",
    "SCFエネルギー",
    "HOMO",
    "LUMO",
    "μ",
    "双極子モーメント",
    "Mulliken最大",
    "Mulliken最小",
    "E_total",
    "E_substrate",
    "E_molecule",
    "QIDE",
    "メモ",
];

/// Cluster counts offered for k-means.
pub const CLUSTER_COUNT_RANGE: (usize, usize) = (2, 6);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    Csv(String),
    /// `requested` is outside the offered range or exceeds the point count.
    InvalidClusterCount { requested: usize, rows: usize },
    UnknownColumn(String),
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(message) => write!(f, "table export failed: {message}"),
            Self::InvalidClusterCount { requested, rows } => write!(
                f,
                "cannot form {requested} clusters from {rows} points (allowed {}..={})",
                CLUSTER_COUNT_RANGE.0, CLUSTER_COUNT_RANGE.1
            ),
            Self::UnknownColumn(name) => write!(f, "unknown numeric column: `{name}`"),
        }
    }
}

impl Error for TableError {}

/// Numeric result columns usable as chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    ScfEnergy,
    Homo,
    Lumo,
    Mu,
    DipoleMoment,
    MullikenMax,
    MullikenMin,
    ETotal,
    ESubstrate,
    EMolecule,
    Qide,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 11] = [
        Self::ScfEnergy,
        Self::Homo,
        Self::Lumo,
        Self::Mu,
        Self::DipoleMoment,
        Self::MullikenMax,
        Self::MullikenMin,
        Self::ETotal,
        Self::ESubstrate,
        Self::EMolecule,
        Self::Qide,
    ];

    /// Column header, identical to the `data.yaml` key.
    pub fn label(self) -> &'static str {
        match self {
            Self::ScfEnergy => "SCFエネルギー",
            Self::Homo => "HOMO",
            Self::Lumo => "LUMO",
            Self::Mu => "μ",
            Self::DipoleMoment => "双極子モーメント",
            Self::MullikenMax => "Mulliken最大",
            Self::MullikenMin => "Mulliken最小",
            Self::ETotal => "E_total",
            Self::ESubstrate => "E_substrate",
            Self::EMolecule => "E_molecule",
            Self::Qide => "QIDE",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, TableError> {
        Self::ALL
            .into_iter()
            .find(|column| column.label() == label)
            .ok_or_else(|| TableError::UnknownColumn(label.to_string()))
    }

    pub fn value(self, result: &StructureResult) -> f64 {
        let input = &result.input;
        match self {
            Self::ScfEnergy => input.scf_energy,
            Self::Homo => input.homo,
            Self::Lumo => input.lumo,
            Self::Mu => result.mu(),
            Self::DipoleMoment => input.dipole_moment,
            Self::MullikenMax => input.mulliken_max,
            Self::MullikenMin => input.mulliken_min,
            Self::ETotal => input.e_total,
            Self::ESubstrate => input.e_substrate,
            Self::EMolecule => input.e_molecule,
            Self::Qide => result.qide(),
        }
    }
}

/// One result flattened to display strings in [`DISPLAY_COLUMNS`] order.
pub fn display_row(result: &StructureResult) -> Vec<String> {
    let mut row = Vec::with_capacity(DISPLAY_COLUMNS.len());
    row.push(result.name().to_string());
    row.push(result.tag.to_string());
    for column in [
        NumericColumn::ScfEnergy,
        NumericColumn::Homo,
        NumericColumn::Lumo,
        NumericColumn::Mu,
        NumericColumn::DipoleMoment,
        NumericColumn::MullikenMax,
        NumericColumn::MullikenMin,
        NumericColumn::ETotal,
        NumericColumn::ESubstrate,
        NumericColumn::EMolecule,
        NumericColumn::Qide,
    ] {
        row.push(column.value(result).to_string());
    }
    row.push(result.input.notes.clone());
    row
}

/// UTF-8 CSV of all results with a [`DISPLAY_COLUMNS`] header row.
pub fn export_csv(results: &[StructureResult]) -> Result<Vec<u8>, TableError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(DISPLAY_COLUMNS)
        .map_err(|err| TableError::Csv(err.to_string()))?;
    for result in results {
        writer
            .write_record(display_row(result))
            .map_err(|err| TableError::Csv(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| TableError::Csv(err.to_string()))
}

/// A labeled chart point.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Points sharing one structure tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub tag: StructureTag,
    pub points: Vec<ScatterPoint>,
}

/// Groups `(x, y)` points by tag, tags in first-seen order.
pub fn scatter_series(
    results: &[StructureResult],
    x: NumericColumn,
    y: NumericColumn,
) -> Vec<ScatterGroup> {
    let mut groups: Vec<ScatterGroup> = Vec::new();
    for result in results {
        let point = ScatterPoint {
            label: result.name().to_string(),
            x: x.value(result),
            y: y.value(result),
        };
        match groups.iter_mut().find(|group| group.tag == result.tag) {
            Some(group) => group.points.push(point),
            None => groups.push(ScatterGroup {
                tag: result.tag,
                points: vec![point],
            }),
        }
    }
    groups
}

/// `[x, y]` rows for clustering; rows with a non-finite value are dropped.
pub fn feature_matrix(
    results: &[StructureResult],
    x: NumericColumn,
    y: NumericColumn,
) -> Vec<[f64; 2]> {
    results
        .iter()
        .map(|result| [x.value(result), y.value(result)])
        .filter(|row| row.iter().all(|value| value.is_finite()))
        .collect()
}

/// Checks `requested` against the offered range and the number of rows.
pub fn validate_cluster_count(requested: usize, rows: usize) -> Result<usize, TableError> {
    let (min, max) = CLUSTER_COUNT_RANGE;
    if requested < min || requested > max || requested > rows {
        return Err(TableError::InvalidClusterCount { requested, rows });
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::StructureInput;

    fn result(name: &str, homo: f64, lumo: f64) -> StructureResult {
        StructureResult::from_input(StructureInput {
            homo,
            lumo,
            ..StructureInput::named(name)
        })
    }

    #[test]
    fn labels_round_trip_and_match_display_columns() {
        for column in NumericColumn::ALL {
            assert_eq!(NumericColumn::from_label(column.label()).unwrap(), column);
            assert!(DISPLAY_COLUMNS.contains(&column.label()));
        }
        assert!(NumericColumn::from_label("構造名").is_err());
    }

    #[test]
    fn export_writes_header_and_rows() {
        let mut first = result("MMA Dimer", -0.5, -0.25);
        first.input.notes = "電荷が偏在, 反応性高".to_string();
        let csv =
            String::from_utf8(export_csv(&[first, result("Slab", 0.0, 0.0)]).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), DISPLAY_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("MMA Dimer,Dimer,0,-0.5,-0.25,0.375,"));
        assert!(row.ends_with("\"電荷が偏在, 反応性高\""));
        assert!(lines.next().unwrap().starts_with("Slab,Other,"));
    }

    #[test]
    fn scatter_groups_keep_first_seen_tag_order() {
        let results = [
            result("A Dimer", -0.2, -0.1),
            result("B Trimer", -0.3, -0.1),
            result("C Dimer", -0.4, -0.1),
        ];
        let groups = scatter_series(&results, NumericColumn::Homo, NumericColumn::Mu);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].tag, StructureTag::Dimer);
        assert_eq!(groups[0].points.len(), 2);
        assert_eq!(groups[0].points[1].label, "C Dimer");
        assert_eq!(groups[0].points[1].y, results[2].mu());
        assert_eq!(groups[1].tag, StructureTag::Trimer);
    }

    #[test]
    fn feature_matrix_drops_non_finite_rows() {
        let results = [result("a", -0.2, -0.1), result("b", f64::NAN, -0.1)];
        let matrix = feature_matrix(&results, NumericColumn::Homo, NumericColumn::Lumo);
        assert_eq!(matrix, vec![[-0.2, -0.1]]);
    }

    #[test]
    fn cluster_count_is_bounded() {
        assert_eq!(validate_cluster_count(3, 10).unwrap(), 3);
        assert!(validate_cluster_count(1, 10).is_err());
        assert!(validate_cluster_count(7, 10).is_err());
        assert!(validate_cluster_count(4, 3).is_err());
    }
}
