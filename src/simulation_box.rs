//! Periodic 2D simulation cell: minimum image convention and wrapping.
use na::Vector2;

use crate::errors::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationBox {
    cell_dim: Vector2<f64>,
}

impl SimulationBox {
    pub fn new(cell_dim: Vector2<f64>) -> Result<Self> {
        Self::check(&cell_dim)?;
        Ok(Self { cell_dim })
    }

    fn check(cell_dim: &Vector2<f64>) -> Result<()> {
        if cell_dim.iter().all(|l| l.is_finite() && *l > 0.0) {
            Ok(())
        } else {
            Err(SimError::InvalidCell {
                x: cell_dim.x,
                y: cell_dim.y,
            })
        }
    }

    pub fn cell_dim(&self) -> &Vector2<f64> {
        &self.cell_dim
    }

    pub fn volume(&self) -> f64 {
        self.cell_dim.x * self.cell_dim.y
    }

    /// Replaces the displacement `rij` by its nearest periodic image.
    pub fn minimum_image(&self, rij: &mut Vector2<f64>) {
        for a in 0..2 {
            let l = self.cell_dim[a];
            rij[a] -= l * (rij[a] / l).round();
        }
    }

    /// Maps a position into `[0, cell_dim)` along each axis.
    pub fn wrap(&self, r: &mut Vector2<f64>) {
        for a in 0..2 {
            let l = self.cell_dim[a];
            let mut s = r[a].rem_euclid(l);
            // rem_euclid of a tiny negative number rounds up to l
            if s >= l {
                s = 0.0;
            }
            r[a] = s;
        }
    }

    /// Isotropic rescaling of the cell lengths.
    pub fn scale(&mut self, mu: f64) -> Result<()> {
        let scaled = self.cell_dim * mu;
        Self::check(&scaled)?;
        self.cell_dim = scaled;
        Ok(())
    }
}
