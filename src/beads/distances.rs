//! Minimum-image displacements between indexed bead pairs.
use na::{DVector, Matrix2xX, Vector2};

use crate::simulation_box::SimulationBox;

/// Displacements `r_i - r_j` (one column per pair) and their squared lengths.
#[derive(Debug, Clone)]
pub struct PairDistances {
    pub dxy: Matrix2xX<f64>,
    pub r2: DVector<f64>,
}

impl PairDistances {
    pub fn len(&self) -> usize {
        self.r2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r2.is_empty()
    }

    pub fn displacement(&self, n: usize) -> Vector2<f64> {
        self.dxy.column(n).into_owned()
    }
}

/// Minimum-image displacement `r_i - r_j`.
pub fn displacement(
    positions: &Matrix2xX<f64>,
    sim_box: &SimulationBox,
    i: usize,
    j: usize,
) -> Vector2<f64> {
    let mut rij: Vector2<f64> = positions.column(i) - positions.column(j);
    sim_box.minimum_image(&mut rij);
    rij
}

pub fn pair_displacements<I>(
    positions: &Matrix2xX<f64>,
    sim_box: &SimulationBox,
    pairs: I,
) -> PairDistances
where
    I: IntoIterator<Item = (usize, usize)>,
    I::IntoIter: ExactSizeIterator,
{
    let pairs = pairs.into_iter();
    let n_pairs = pairs.len();
    let mut dxy = Matrix2xX::zeros(n_pairs);
    let mut r2 = DVector::zeros(n_pairs);

    for (n, (i, j)) in pairs.enumerate() {
        let rij = displacement(positions, sim_box, i, j);
        r2[n] = rij.norm_squared();
        dxy.set_column(n, &rij);
    }

    PairDistances { dxy, r2 }
}
