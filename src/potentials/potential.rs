use na::Vector2;

/// A central two-body interaction.
pub trait PairPotential: Send + Sync {
    /// Energy and force on bead i for the displacement `rij = r_i - r_j`.
    /// The force on bead j is the negation.
    fn compute_potential(&self, rij: &Vector2<f64>) -> (f64, Vector2<f64>);
}
