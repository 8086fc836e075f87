//! Structure-name classification.
//!
//! Rules are evaluated top to bottom and the first substring hit wins, so a
//! name such as `Trimer-Dimer-X` is a trimer. Matching is case-sensitive.

use crate::model::result::StructureTag;

/// Ordered `(pattern, tag)` rules.
pub const CLASSIFICATION_RULES: &[(&str, StructureTag)] = &[
    ("Trimer", StructureTag::Trimer),
    ("Dimer", StructureTag::Dimer),
    ("Tetramer", StructureTag::Tetramer),
];

/// Returns the tag of the first rule whose pattern occurs in `name`, or
/// `StructureTag::Other`.
pub fn classify(name: &str) -> StructureTag {
    classify_with(CLASSIFICATION_RULES, name)
}

/// Same as [`classify`] over a caller-supplied rule table.
pub fn classify_with(rules: &[(&str, StructureTag)], name: &str) -> StructureTag {
    rules
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map(|(_, tag)| *tag)
        .unwrap_or(StructureTag::Other)
}
