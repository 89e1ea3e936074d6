//! Ensemble control strategies plugged into the integrator step.
use na::Matrix2xX;

use crate::beads::Beads;
use crate::errors::Result;

pub mod kind;
pub mod npt;
pub mod nve;
pub mod nvt;

pub use kind::EnsembleKind;
pub use npt::{BerendsenBarostat, LangevinNpt};
pub use nve::Nve;
pub use nvt::LangevinThermostat;

pub trait Ensemble: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether a Gaussian kick has to be drawn every step.
    fn uses_noise(&self) -> bool;

    /// Thermostat velocity increment `d_vel` given the half-kicked velocities.
    fn velocity_increment(
        &self,
        velocities: &Matrix2xX<f64>,
        beta: Option<&Matrix2xX<f64>>,
    ) -> Matrix2xX<f64>;

    /// Isotropic scale factor for positions and cell, evaluated after the half kick.
    fn volume_scale(&self, beads: &Beads) -> Result<Option<f64>>;
}
