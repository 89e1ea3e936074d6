use na::Matrix2xX;

use crate::beads::Beads;
use crate::ensemble::Ensemble;
use crate::errors::Result;

// Langevin thermostat: d_vel = sigma * beta - gamma * vel, beta ~ N(0, 1)
#[derive(Debug, Clone)]
pub struct LangevinThermostat {
    pub sigma: f64,
    pub gamma: f64,
}

impl LangevinThermostat {
    pub fn new(sigma: f64, gamma: f64) -> Self {
        Self { sigma, gamma }
    }
}

impl Ensemble for LangevinThermostat {
    fn name(&self) -> &'static str {
        "nvt"
    }

    fn uses_noise(&self) -> bool {
        true
    }

    fn velocity_increment(
        &self,
        velocities: &Matrix2xX<f64>,
        beta: Option<&Matrix2xX<f64>>,
    ) -> Matrix2xX<f64> {
        let friction = velocities * -self.gamma;
        match beta {
            Some(beta) => beta * self.sigma + friction,
            None => friction,
        }
    }

    fn volume_scale(&self, _beads: &Beads) -> Result<Option<f64>> {
        Ok(None)
    }
}
