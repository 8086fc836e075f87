//! Per-structure calculation result model.
//!
//! # Responsibility
//! - Define the form input for one structure and the stored result built
//!   from it.
//! - Expose μ and QIDE as computed views over the stored energies.
//!
//! # Invariants
//! - `StructureResult` has no μ/QIDE fields; both are recomputed from the
//!   energies whenever they are read or written.
//! - `tag` is derived from `input.name` by [`crate::chem::classify`].

use super::{check_slug, slugify, ValidationError};
use crate::chem::{classify, metrics};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Structure category derived from the structure name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureTag {
    Trimer,
    Dimer,
    Tetramer,
    Other,
}

impl StructureTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trimer => "Trimer",
            Self::Dimer => "Dimer",
            Self::Tetramer => "Tetramer",
            Self::Other => "Other",
        }
    }
}

impl Display for StructureTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values submitted for one structure. Energies in hartree, dipole in Debye.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureInput {
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

impl StructureInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyStructureName);
        }
        check_slug(&self.name)
    }

    /// Directory name for this structure under the results root.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// A stored structure result.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureResult {
    pub input: StructureInput,
    pub tag: StructureTag,
    /// `structure.png` next to `data.yaml`, when present.
    pub image_path: Option<PathBuf>,
}

impl StructureResult {
    /// Builds a result from form input, classifying its tag.
    pub fn from_input(input: StructureInput) -> Self {
        let tag = classify::classify(&input.name);
        Self {
            input,
            tag,
            image_path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.input.name
    }

    pub fn mu(&self) -> f64 {
        metrics::mu(self.input.homo, self.input.lumo)
    }

    pub fn qide(&self) -> f64 {
        metrics::qide(
            self.input.e_total,
            self.input.e_substrate,
            self.input.e_molecule,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values_follow_the_energies() {
        let mut result = StructureResult::from_input(StructureInput {
            homo: -0.25,
            lumo: -0.05,
            e_total: -300.5,
            e_substrate: -200.25,
            e_molecule: -100.0,
            ..StructureInput::named("MMA-MAA Dimer")
        });
        assert_eq!(result.tag, StructureTag::Dimer);
        assert_eq!(result.mu(), -(-0.25 + -0.05) / 2.0);
        assert_eq!(result.qide(), -300.5 - -200.25 - -100.0);

        result.input.homo = -0.5;
        result.input.e_molecule = -99.0;
        assert_eq!(result.mu(), -(-0.5 + -0.05) / 2.0);
        assert_eq!(result.qide(), -300.5 - -200.25 - -99.0);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            StructureInput::named("  ").validate(),
            Err(ValidationError::EmptyStructureName)
        );
        assert_eq!(StructureInput::named("Bulk Slab").slug(), "Bulk_Slab");
    }
}
