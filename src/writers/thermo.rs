use std::fmt;

use crate::beads::Beads;

/// Instantaneous observables reported every `thermo` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Thermo {
    pub step: usize,
    pub potential_energy: f64,
    pub kinetic_energy: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub cell_x: f64,
    pub cell_y: f64,
}

impl Thermo {
    pub fn from_beads(step: usize, beads: &Beads) -> Self {
        let kinetic_energy = beads.kinetic_energy();
        let cell_dim = beads.sim_box.cell_dim();
        Self {
            step,
            potential_energy: beads.potential_energy,
            kinetic_energy,
            temperature: beads.temperature(kinetic_energy),
            pressure: beads.pressure(kinetic_energy),
            cell_x: cell_dim.x,
            cell_y: cell_dim.y,
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }
}

impl fmt::Display for Thermo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>8} pe {:>12.6} ke {:>12.6} etot {:>12.6} kbt {:>10.6} press {:>12.6} cell {:.4} {:.4}",
            self.step,
            self.potential_energy,
            self.kinetic_energy,
            self.total_energy(),
            self.temperature,
            self.pressure,
            self.cell_x,
            self.cell_y
        )
    }
}
