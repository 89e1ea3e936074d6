use na::Matrix2xX;

use crate::beads::Beads;
use crate::ensemble::{nvt::LangevinThermostat, Ensemble};
use crate::errors::{Result, SimError};

// Weak coupling of the instantaneous pressure to p_0 through isotropic rescaling
// of the cell, Berendsen et al. (1984) J. Chem. Phys. 81, 3684.
#[derive(Debug, Clone)]
pub struct BerendsenBarostat {
    pub lambda_p: f64,
    pub p_0: f64,
}

impl BerendsenBarostat {
    pub fn new(lambda_p: f64, p_0: f64) -> Self {
        Self { lambda_p, p_0 }
    }

    /// mu = (1 + lambda_p (P_t - P_0))^(1/3)
    pub fn scale_factor(&self, pressure: f64) -> Result<f64> {
        let base = 1.0 + self.lambda_p * (pressure - self.p_0);
        if !(base.is_finite() && base > 0.0) {
            return Err(SimError::InvalidScale { base });
        }
        Ok(base.cbrt())
    }
}

#[derive(Debug, Clone)]
pub struct LangevinNpt {
    pub thermostat: LangevinThermostat,
    pub barostat: BerendsenBarostat,
}

impl Ensemble for LangevinNpt {
    fn name(&self) -> &'static str {
        "npt"
    }

    fn uses_noise(&self) -> bool {
        true
    }

    fn velocity_increment(
        &self,
        velocities: &Matrix2xX<f64>,
        beta: Option<&Matrix2xX<f64>>,
    ) -> Matrix2xX<f64> {
        self.thermostat.velocity_increment(velocities, beta)
    }

    fn volume_scale(&self, beads: &Beads) -> Result<Option<f64>> {
        let kinetic_energy = beads.kinetic_energy();
        let pressure = beads.pressure(kinetic_energy);
        self.barostat.scale_factor(pressure).map(Some)
    }
}
