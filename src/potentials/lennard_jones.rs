use na::Vector2;

use crate::potentials::potential::PairPotential;

/// 12-6 Lennard-Jones in shifted-force form: both the energy and the force go
/// to zero at the cutoff.
#[derive(Debug, Clone)]
pub struct LennardJones {
    epsilon: f64,
    sigma: f64,
    rcut: f64,
    u_cutoff: f64,
    du_cutoff: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64, rcut: f64) -> Self {
        let mut this = Self {
            epsilon,
            sigma,
            rcut,
            u_cutoff: 0.0,
            du_cutoff: 0.0,
        };
        this.u_cutoff = this.unshifted_energy(rcut * rcut);
        this.du_cutoff = -this.unshifted_force_over_r(rcut * rcut) * rcut;
        this
    }

    pub fn rcut(&self) -> f64 {
        self.rcut
    }

    fn powers(&self, rij2: f64) -> (f64, f64) {
        let vanderwaals_attraction = (self.sigma.powi(2) / rij2).powi(3);
        let lj_repulsion = vanderwaals_attraction.powi(2);
        (lj_repulsion, vanderwaals_attraction)
    }

    fn unshifted_energy(&self, rij2: f64) -> f64 {
        let (repulsion, attraction) = self.powers(rij2);
        4.0 * self.epsilon * (repulsion - attraction)
    }

    /// -U'(r) / r
    fn unshifted_force_over_r(&self, rij2: f64) -> f64 {
        let (repulsion, attraction) = self.powers(rij2);
        24.0 * self.epsilon * (2.0 * repulsion - attraction) / rij2
    }
}

impl PairPotential for LennardJones {
    fn compute_potential(&self, rij: &Vector2<f64>) -> (f64, Vector2<f64>) {
        let rij2 = rij.norm_squared();
        let r = rij2.sqrt();

        let potential_energy =
            self.unshifted_energy(rij2) - self.u_cutoff - (r - self.rcut) * self.du_cutoff;
        let force = (self.unshifted_force_over_r(rij2) + self.du_cutoff / r) * rij;

        (potential_energy, force)
    }
}
