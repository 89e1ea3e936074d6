//! Three-body bending term `k0 (cos θ + 1)`, minimal for a straight chain.
use na::Vector2;

use crate::math::{cross2, perp};

#[derive(Debug, Clone)]
pub struct AngleBending {
    pub k0: f64,
}

/// Result of one bending evaluation for the triplet (i, j, k).
#[derive(Debug, Clone, PartialEq)]
pub struct AngleTerm {
    pub cos_theta: f64,
    pub sin_theta: f64,
    pub potential_energy: f64,
    pub force_i: Vector2<f64>,
    pub force_j: Vector2<f64>,
    pub force_k: Vector2<f64>,
}

impl AngleBending {
    pub fn new(k0: f64) -> Self {
        Self { k0 }
    }

    /// `a = r_i - r_j` and `b = r_k - r_j`, both pointing away from the shared bead.
    /// Callers must rule out zero-length vectors.
    pub fn compute(&self, a: &Vector2<f64>, b: &Vector2<f64>) -> AngleTerm {
        let a2 = a.norm_squared();
        let b2 = b.norm_squared();
        let r_prod = (a2 * b2).sqrt();

        let cos_theta = a.dot(b) / r_prod;
        let sin_theta = cross2(a, b) / r_prod;

        // -d(cos θ)/da = sin θ * perp(a) / |a|^2 with θ the signed angle from a to b
        let force_i = (-self.k0 * sin_theta / a2) * perp(a);
        let force_k = (self.k0 * sin_theta / b2) * perp(b);
        let force_j = -(force_i + force_k);

        AngleTerm {
            cos_theta,
            sin_theta,
            potential_energy: self.k0 * (cos_theta + 1.0),
            force_i,
            force_j,
            force_k,
        }
    }
}
