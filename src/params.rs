//! Immutable force-field and thermostat parameters shared by every rank.
use crate::constants::N_DIM;
use crate::errors::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    pub mass: f64,
    pub n_dim: usize,
    pub n_bead: usize,
    pub vdw_sigma: f64,
    pub vdw_epsilon: f64,
    /// Non-bonded cutoff radius
    pub rc: f64,
    pub bond_r0: f64,
    pub bond_k0: f64,
    pub angle_k0: f64,
    /// Thermostat noise scale
    pub sigma: f64,
    /// Thermostat friction per step
    pub gamma: f64,
    pub lambda_p: f64,
    pub p_0: f64,
}

impl Default for ParamSet {
    fn default() -> Self {
        Self {
            mass: 1.0,
            n_dim: N_DIM,
            n_bead: 0,
            vdw_sigma: 1.0,
            vdw_epsilon: 1.0,
            rc: 3.0,
            bond_r0: 1.0,
            bond_k0: 10.0,
            angle_k0: 10.0,
            sigma: 0.0,
            gamma: 0.0,
            lambda_p: 1e-5,
            p_0: 1.0,
        }
    }
}

impl ParamSet {
    pub fn validate(&self) -> Result<()> {
        if self.n_dim != N_DIM {
            return Err(SimError::InvalidDimension { n_dim: self.n_dim });
        }

        let strictly_positive = [
            ("mass", self.mass),
            ("vdw_sigma", self.vdw_sigma),
            ("rc", self.rc),
        ];
        for (name, value) in strictly_positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidParameter { name, value });
            }
        }

        let non_negative = [
            ("vdw_epsilon", self.vdw_epsilon),
            ("bond_r0", self.bond_r0),
            ("bond_k0", self.bond_k0),
            ("angle_k0", self.angle_k0),
            ("sigma", self.sigma),
            ("gamma", self.gamma),
            ("lambda_p", self.lambda_p),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::InvalidParameter { name, value });
            }
        }

        if !self.p_0.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "p_0",
                value: self.p_0,
            });
        }
        Ok(())
    }

    /// Noise scale satisfying fluctuation-dissipation for the given friction
    /// and thermal energy: sigma^2 = 2 gamma kBT / m.
    pub fn thermostat_sigma(gamma: f64, kbt: f64, mass: f64) -> f64 {
        (2.0 * gamma * kbt / mass).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_valid() {
        ParamSet::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_values() {
        let params = ParamSet {
            n_dim: 3,
            ..ParamSet::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidDimension { n_dim: 3 })
        ));

        let params = ParamSet {
            rc: 0.0,
            ..ParamSet::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimError::InvalidParameter { name: "rc", .. })
        ));

        let params = ParamSet {
            gamma: -0.1,
            ..ParamSet::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn fluctuation_dissipation_sigma() {
        assert_relative_eq!(ParamSet::thermostat_sigma(0.5, 1.0, 1.0), 1.0);
        assert_relative_eq!(ParamSet::thermostat_sigma(0.0, 1.0, 1.0), 0.0);
    }
}
