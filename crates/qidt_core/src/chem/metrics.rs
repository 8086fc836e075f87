//! Derived scalar metrics. Pure functions; any finite input is valid.

/// Chemical-potential proxy: `-(HOMO + LUMO) / 2`.
pub fn mu(homo: f64, lumo: f64) -> f64 {
    -(homo + lumo) / 2.0
}

/// Interface design energy: `E_total - E_substrate - E_molecule`.
pub fn qide(e_total: f64, e_substrate: f64, e_molecule: f64) -> f64 {
    e_total - e_substrate - e_molecule
}

#[cfg(test)]
mod tests {
    use super::{mu, qide};

    #[test]
    fn mu_is_negated_mean_of_frontier_orbitals() {
        assert_eq!(mu(-0.25, 0.05), -(-0.25 + 0.05) / 2.0);
        assert_eq!(mu(0.0, 0.0), 0.0);
        assert_eq!(mu(-0.5, -0.25), 0.375);
    }

    #[test]
    fn qide_subtracts_fragments_from_total() {
        assert_eq!(qide(-150.0, -100.0, -40.0), -10.0);
        assert_eq!(qide(0.0, 0.0, 0.0), 0.0);
        let (total, sub, mol) = (-1234.567891, -987.654321, -246.8);
        assert_eq!(qide(total, sub, mol), total - sub - mol);
    }
}
