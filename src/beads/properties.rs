use na::Matrix2xX;

use crate::beads::new::Beads;
use crate::constants::N_DIM;

impl Beads {
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocities.norm_squared()
    }

    /// Instantaneous temperature in energy units (kBT), equipartition over N_DIM
    /// degrees of freedom per bead.
    pub fn temperature(&self, kinetic_energy: f64) -> f64 {
        if self.n_beads == 0 {
            return 0.0;
        }
        2.0 * kinetic_energy / (N_DIM * self.n_beads) as f64
    }

    /// Instantaneous pressure `(KE + tr(W) / 2) / (N_DIM V)`, with `W` positive
    /// for repulsive pairs.
    pub fn pressure(&self, kinetic_energy: f64) -> f64 {
        let volume = self.sim_box.volume();
        (kinetic_energy + 0.5 * self.virial.trace()) / (N_DIM as f64 * volume)
    }

    pub fn current_acceleration(&self) -> Matrix2xX<f64> {
        &self.forces / self.mass
    }
}
