use na::Matrix2xX;

use crate::beads::Beads;
use crate::ensemble::{
    npt::{BerendsenBarostat, LangevinNpt},
    nve::Nve,
    nvt::LangevinThermostat,
    Ensemble,
};
use crate::errors::{Result, SimError};
use crate::params::ParamSet;

/// Ensemble chosen at configuration time.
#[derive(Debug, Clone)]
pub enum EnsembleKind {
    Nve(Nve),
    LangevinNvt(LangevinThermostat),
    LangevinNpt(LangevinNpt),
}

impl EnsembleKind {
    pub fn from_name(name: &str, params: &ParamSet) -> Result<Self> {
        let thermostat = LangevinThermostat::new(params.sigma, params.gamma);
        match name {
            "nve" => Ok(Self::Nve(Nve)),
            "nvt" => Ok(Self::LangevinNvt(thermostat)),
            "npt" => Ok(Self::LangevinNpt(LangevinNpt {
                thermostat,
                barostat: BerendsenBarostat::new(params.lambda_p, params.p_0),
            })),
            _ => Err(SimError::UnknownEnsemble {
                name: name.to_string(),
            }),
        }
    }

    fn inner(&self) -> &dyn Ensemble {
        match self {
            Self::Nve(e) => e,
            Self::LangevinNvt(e) => e,
            Self::LangevinNpt(e) => e,
        }
    }
}

impl Ensemble for EnsembleKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn uses_noise(&self) -> bool {
        self.inner().uses_noise()
    }

    fn velocity_increment(
        &self,
        velocities: &Matrix2xX<f64>,
        beta: Option<&Matrix2xX<f64>>,
    ) -> Matrix2xX<f64> {
        self.inner().velocity_increment(velocities, beta)
    }

    fn volume_scale(&self, beads: &Beads) -> Result<Option<f64>> {
        self.inner().volume_scale(beads)
    }
}
