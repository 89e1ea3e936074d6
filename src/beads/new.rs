use na::{Matrix2, Matrix2xX};

use crate::errors::{Result, SimError};
use crate::simulation_box::SimulationBox;

/// Replicated per-rank state: one column per bead.
#[derive(Debug, Clone)]
pub struct Beads {
    pub n_beads: usize,
    pub positions: Matrix2xX<f64>,
    pub velocities: Matrix2xX<f64>,
    pub forces: Matrix2xX<f64>,
    pub mass: f64,
    pub sim_box: SimulationBox,
    /// Virial of the last force evaluation
    pub virial: Matrix2<f64>,
    /// Potential energy of the last force evaluation
    pub potential_energy: f64,
}

impl Beads {
    pub fn new_zeroes(n_beads: usize, sim_box: SimulationBox) -> Self {
        Self {
            n_beads,
            positions: Matrix2xX::zeros(n_beads),
            velocities: Matrix2xX::zeros(n_beads),
            forces: Matrix2xX::zeros(n_beads),
            mass: 1.0,
            sim_box,
            virial: Matrix2::zeros(),
            potential_energy: 0.0,
        }
    }

    pub fn new(positions: Matrix2xX<f64>, mass: f64, sim_box: SimulationBox) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "mass",
                value: mass,
            });
        }
        let n_beads = positions.ncols();
        let mut this = Self::new_zeroes(n_beads, sim_box);
        this.positions = positions;
        this.mass = mass;
        this.wrap_positions();
        Ok(this)
    }

    pub fn with_velocities(mut self, velocities: Matrix2xX<f64>) -> Result<Self> {
        if velocities.ncols() != self.n_beads {
            return Err(SimError::BeadCountMismatch {
                expected: self.n_beads,
                found: velocities.ncols(),
            });
        }
        self.velocities = velocities;
        Ok(self)
    }
}
