use na::Vector2;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::beads::new::Beads;
use crate::errors::{Result, SimError};

impl Beads {
    /// Gaussian velocities at thermal energy `kbt`, without centre of mass drift.
    pub fn start_velocities(&mut self, kbt: f64, seed: u64) -> Result<()> {
        if !(kbt.is_finite() && kbt >= 0.0) {
            return Err(SimError::InvalidParameter {
                name: "kbt",
                value: kbt,
            });
        }
        self.initialise_velocities(kbt, seed)?;
        self.remove_drift();
        self.rescale_to_temperature(kbt);
        Ok(())
    }

    fn initialise_velocities(&mut self, kbt: f64, seed: u64) -> Result<()> {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let std_dev = (kbt / self.mass).sqrt();
        let normal = Normal::new(0.0, std_dev).map_err(|_| SimError::InvalidParameter {
            name: "kbt",
            value: kbt,
        })?;

        for v in self.velocities.iter_mut() {
            *v = normal.sample(&mut rng);
        }
        Ok(())
    }

    fn remove_drift(&mut self) {
        if self.n_beads == 0 {
            return;
        }
        // equal masses, so the centre of mass velocity is the column mean
        let velocity_cm: Vector2<f64> = self.velocities.column_mean();
        for mut v_i in self.velocities.column_iter_mut() {
            v_i -= velocity_cm;
        }
    }

    fn rescale_to_temperature(&mut self, kbt: f64) {
        let kinetic_energy = self.kinetic_energy();
        let current = self.temperature(kinetic_energy);
        if current > 0.0 {
            self.velocities *= (kbt / current).sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_box::SimulationBox;
    use approx::assert_relative_eq;

    #[test]
    fn start_velocities_hits_target_without_drift() {
        let sim_box = SimulationBox::new(Vector2::new(10.0, 10.0)).unwrap();
        let mut beads = Beads::new_zeroes(50, sim_box);
        beads.mass = 2.0;
        beads.start_velocities(1.3, 7).unwrap();

        let ke = beads.kinetic_energy();
        assert_relative_eq!(beads.temperature(ke), 1.3, epsilon = 1e-10);
        let drift = beads.velocities.column_mean();
        assert!(drift.norm() < 1e-12);
    }

    #[test]
    fn same_seed_same_velocities() {
        let sim_box = SimulationBox::new(Vector2::new(10.0, 10.0)).unwrap();
        let mut a = Beads::new_zeroes(5, sim_box.clone());
        let mut b = Beads::new_zeroes(5, sim_box);
        a.start_velocities(1.0, 3).unwrap();
        b.start_velocities(1.0, 3).unwrap();
        assert_eq!(a.velocities, b.velocities);
    }
}
