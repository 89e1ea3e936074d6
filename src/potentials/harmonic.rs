use na::Vector2;

use crate::potentials::potential::PairPotential;

/// Harmonic spring `0.5 k0 (r - r0)^2`.
#[derive(Debug, Clone)]
pub struct HarmonicBond {
    pub k0: f64,
    pub r0: f64,
}

impl HarmonicBond {
    pub fn new(k0: f64, r0: f64) -> Self {
        Self { k0, r0 }
    }
}

impl PairPotential for HarmonicBond {
    fn compute_potential(&self, rij: &Vector2<f64>) -> (f64, Vector2<f64>) {
        let r = rij.norm();
        let stretch = r - self.r0;
        let potential_energy = 0.5 * self.k0 * stretch.powi(2);
        // radial force -k0 (r - r0) along rij / r
        let force = (-self.k0 * stretch / r) * rij;
        (potential_energy, force)
    }
}
