use na::Matrix2xX;

use crate::beads::Beads;
use crate::ensemble::Ensemble;
use crate::errors::Result;

/// Plain kinematics: no friction, no noise, fixed cell.
#[derive(Debug, Clone, Default)]
pub struct Nve;

impl Ensemble for Nve {
    fn name(&self) -> &'static str {
        "nve"
    }

    fn uses_noise(&self) -> bool {
        false
    }

    fn velocity_increment(
        &self,
        velocities: &Matrix2xX<f64>,
        _beta: Option<&Matrix2xX<f64>>,
    ) -> Matrix2xX<f64> {
        Matrix2xX::zeros(velocities.ncols())
    }

    fn volume_scale(&self, _beads: &Beads) -> Result<Option<f64>> {
        Ok(None)
    }
}
