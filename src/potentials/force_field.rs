//! Assembles bonded, bending and non-bonded contributions into energy, forces
//! and virial for one configuration.
use na::{DVector, Matrix2, Matrix2xX, Vector2};

use crate::beads::distances::{displacement, pair_displacements};
use crate::constants::MIN_DISTANCE;
use crate::errors::{Result, SimError};
use crate::math::symmetrize;
use crate::params::ParamSet;
use crate::potentials::{
    angular::AngleBending, harmonic::HarmonicBond, lennard_jones::LennardJones,
    potential::PairPotential,
};
use crate::simulation_box::SimulationBox;
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq)]
pub struct ForceOutput {
    pub potential_energy: f64,
    pub forces: Matrix2xX<f64>,
    pub virial: Matrix2<f64>,
    /// Squared distances of the non-bonded pairs, in topology order
    pub pair_r2: DVector<f64>,
}

impl ForceOutput {
    pub fn zeros(n_beads: usize) -> Self {
        Self {
            potential_energy: 0.0,
            forces: Matrix2xX::zeros(n_beads),
            virial: Matrix2::zeros(),
            pair_r2: DVector::zeros(0),
        }
    }

    fn add_pair_force(&mut self, i: usize, j: usize, force_i: &Vector2<f64>) {
        let mut fi = self.forces.column_mut(i);
        fi += force_i;
        let mut fj = self.forces.column_mut(j);
        fj -= force_i;
    }
}

#[derive(Debug, Clone)]
pub struct ForceField {
    bond: HarmonicBond,
    angle: AngleBending,
    vdw: LennardJones,
}

fn ensure_separated(r2: f64, i: usize, j: usize) -> Result<()> {
    if r2 < MIN_DISTANCE * MIN_DISTANCE {
        return Err(SimError::CoincidentBeads { i, j });
    }
    Ok(())
}

impl ForceField {
    pub fn new(bond: HarmonicBond, angle: AngleBending, vdw: LennardJones) -> Self {
        Self { bond, angle, vdw }
    }

    pub fn from_params(params: &ParamSet) -> Self {
        Self::new(
            HarmonicBond::new(params.bond_k0, params.bond_r0),
            AngleBending::new(params.angle_k0),
            LennardJones::new(params.vdw_epsilon, params.vdw_sigma, params.rc),
        )
    }

    pub fn evaluate(
        &self,
        positions: &Matrix2xX<f64>,
        sim_box: &SimulationBox,
        topology: &Topology,
    ) -> Result<ForceOutput> {
        if positions.ncols() != topology.n_beads {
            return Err(SimError::BeadCountMismatch {
                expected: topology.n_beads,
                found: positions.ncols(),
            });
        }
        let mut out = ForceOutput::zeros(topology.n_beads);

        if !topology.bonds.is_empty() {
            self.bonded(positions, sim_box, topology, &mut out)?;
        }
        if !topology.angles.is_empty() {
            self.angular(positions, sim_box, topology, &mut out)?;
        }
        self.non_bonded(positions, sim_box, topology, &mut out)?;

        if !out.potential_energy.is_finite() {
            return Err(SimError::NonFiniteEnergy {
                energy: out.potential_energy,
            });
        }
        out.virial = symmetrize(&out.virial);
        Ok(out)
    }

    fn bonded(
        &self,
        positions: &Matrix2xX<f64>,
        sim_box: &SimulationBox,
        topology: &Topology,
        out: &mut ForceOutput,
    ) -> Result<()> {
        let dist = pair_displacements(
            positions,
            sim_box,
            topology.bonds.iter().map(|b| (b.i, b.j)),
        );

        for (n, bond) in topology.bonds.iter().enumerate() {
            ensure_separated(dist.r2[n], bond.i, bond.j)?;
            let (u, force_i) = self.bond.compute_potential(&dist.displacement(n));
            out.potential_energy += u;
            out.add_pair_force(bond.i, bond.j, &force_i);
        }
        Ok(())
    }

    fn angular(
        &self,
        positions: &Matrix2xX<f64>,
        sim_box: &SimulationBox,
        topology: &Topology,
        out: &mut ForceOutput,
    ) -> Result<()> {
        for angle in &topology.angles {
            let a = displacement(positions, sim_box, angle.i, angle.j);
            let b = displacement(positions, sim_box, angle.k, angle.j);
            ensure_separated(a.norm_squared(), angle.i, angle.j)?;
            ensure_separated(b.norm_squared(), angle.k, angle.j)?;

            let term = self.angle.compute(&a, &b);
            out.potential_energy += term.potential_energy;
            {
                let mut fi = out.forces.column_mut(angle.i);
                fi += term.force_i;
                let mut fj = out.forces.column_mut(angle.j);
                fj += term.force_j;
                let mut fk = out.forces.column_mut(angle.k);
                fk += term.force_k;
            }
        }
        Ok(())
    }

    fn non_bonded(
        &self,
        positions: &Matrix2xX<f64>,
        sim_box: &SimulationBox,
        topology: &Topology,
        out: &mut ForceOutput,
    ) -> Result<()> {
        let dist = pair_displacements(
            positions,
            sim_box,
            topology.pairs.iter().map(|p| (p.i, p.j)),
        );
        let rcut2 = self.vdw.rcut().powi(2);

        for (n, pair) in topology.pairs.iter().enumerate() {
            if pair.coeff == 0.0 || dist.r2[n] >= rcut2 {
                continue;
            }
            ensure_separated(dist.r2[n], pair.i, pair.j)?;

            let rij = dist.displacement(n);
            let (u, force) = self.vdw.compute_potential(&rij);
            let force_i = pair.coeff * force;
            out.potential_energy += pair.coeff * u;
            out.add_pair_force(pair.i, pair.j, &force_i);

            if pair.virial {
                // W_ab = F_a d_b, symmetric for central forces
                out.virial += force_i * rij.transpose();
            }
        }

        out.pair_r2 = dist.r2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Angle, Bond, PairInteraction};
    use approx::assert_relative_eq;

    fn params() -> ParamSet {
        ParamSet {
            n_bead: 2,
            vdw_sigma: 1.0,
            vdw_epsilon: 1.0,
            rc: 3.0,
            bond_r0: 1.0,
            bond_k0: 100.0,
            angle_k0: 10.0,
            ..ParamSet::default()
        }
    }

    fn cell() -> SimulationBox {
        SimulationBox::new(Vector2::new(10.0, 10.0)).unwrap()
    }

    fn positions(points: &[(f64, f64)]) -> Matrix2xX<f64> {
        let columns: Vec<Vector2<f64>> = points.iter().map(|&(x, y)| Vector2::new(x, y)).collect();
        Matrix2xX::from_columns(&columns)
    }

    #[test]
    fn bond_at_equilibrium() {
        let field = ForceField::from_params(&params());
        let topology = Topology::new(2, vec![Bond { i: 0, j: 1 }], vec![], vec![]).unwrap();
        let out = field
            .evaluate(&positions(&[(0.0, 0.0), (1.0, 0.0)]), &cell(), &topology)
            .unwrap();
        assert_relative_eq!(out.potential_energy, 0.0);
        assert_relative_eq!(out.forces.norm(), 0.0);
    }

    #[test]
    fn stretched_bond() {
        let field = ForceField::from_params(&ParamSet {
            bond_r0: 0.5,
            ..params()
        });
        let topology = Topology::new(2, vec![Bond { i: 0, j: 1 }], vec![], vec![]).unwrap();
        let out = field
            .evaluate(&positions(&[(0.0, 0.0), (1.0, 0.0)]), &cell(), &topology)
            .unwrap();
        assert_relative_eq!(out.potential_energy, 12.5);
        assert_relative_eq!(out.forces.column(0).into_owned(), Vector2::new(50.0, 0.0));
        assert_relative_eq!(out.forces.column(1).into_owned(), Vector2::new(-50.0, 0.0));
    }

    #[test]
    fn bond_across_boundary() {
        let field = ForceField::from_params(&ParamSet {
            bond_r0: 0.5,
            ..params()
        });
        let topology = Topology::new(2, vec![Bond { i: 0, j: 1 }], vec![], vec![]).unwrap();
        let out = field
            .evaluate(&positions(&[(9.5, 5.0), (0.5, 5.0)]), &cell(), &topology)
            .unwrap();
        assert_relative_eq!(out.potential_energy, 12.5, epsilon = 1e-10);
        assert_relative_eq!(out.forces[(0, 0)], 50.0, epsilon = 1e-10);
    }

    #[test]
    fn straight_triplet() {
        let field = ForceField::from_params(&params());
        let topology = Topology::new(3, vec![], vec![Angle { i: 0, j: 1, k: 2 }], vec![]).unwrap();
        let out = field
            .evaluate(
                &positions(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
                &cell(),
                &topology,
            )
            .unwrap();
        assert_relative_eq!(out.potential_energy, 0.0);
        assert_relative_eq!(out.forces.norm(), 0.0);
    }

    #[test]
    fn empty_topology_is_zero() {
        let field = ForceField::from_params(&params());
        let topology = Topology::new(3, vec![], vec![], vec![]).unwrap();
        let out = field
            .evaluate(&positions(&[(0.0, 0.0), (0.0, 0.0), (2.0, 0.0)]), &cell(), &topology)
            .unwrap();
        assert_eq!(out, ForceOutput::zeros(3));
    }

    #[test]
    fn pairs_beyond_cutoff_or_disabled_are_skipped() {
        let field = ForceField::from_params(&params());
        let pairs = vec![
            PairInteraction::new(0, 1, 1.0),
            PairInteraction::new(0, 2, 0.0),
        ];
        let topology = Topology::new(3, vec![], vec![], pairs).unwrap();
        let out = field
            .evaluate(&positions(&[(0.0, 0.0), (4.0, 0.0), (0.0, 0.0)]), &cell(), &topology)
            .unwrap();
        assert_relative_eq!(out.potential_energy, 0.0);
        assert_relative_eq!(out.forces.norm(), 0.0);
        assert_relative_eq!(out.pair_r2[0], 16.0);
    }

    #[test]
    fn coincident_beads_are_rejected_in_every_term() {
        let field = ForceField::from_params(&params());
        let at = positions(&[(1.0, 1.0), (1.0, 1.0), (2.0, 1.0)]);

        let bonded = Topology::new(3, vec![Bond { i: 0, j: 1 }], vec![], vec![]).unwrap();
        assert!(matches!(
            field.evaluate(&at, &cell(), &bonded),
            Err(SimError::CoincidentBeads { i: 0, j: 1 })
        ));

        let angular = Topology::new(3, vec![], vec![Angle { i: 2, j: 1, k: 0 }], vec![]).unwrap();
        assert!(matches!(
            field.evaluate(&at, &cell(), &angular),
            Err(SimError::CoincidentBeads { i: 0, j: 1 })
        ));

        let pair = Topology::new(3, vec![], vec![], vec![PairInteraction::new(1, 0, 1.0)]).unwrap();
        assert!(matches!(
            field.evaluate(&at, &cell(), &pair),
            Err(SimError::CoincidentBeads { i: 1, j: 0 })
        ));
    }

    #[test]
    fn virial_of_repulsive_pair() {
        let field = ForceField::from_params(&params());
        let topology =
            Topology::new(2, vec![], vec![], vec![PairInteraction::new(0, 1, 1.0)]).unwrap();
        let out = field
            .evaluate(&positions(&[(1.0, 1.0), (1.9, 1.0)]), &cell(), &topology)
            .unwrap();
        // bead 0 is pushed away from bead 1, towards -x
        assert!(out.forces[(0, 0)] < 0.0);
        assert!(out.virial[(0, 0)] > 0.0);
        assert_relative_eq!(out.virial[(1, 1)], 0.0);
        assert_relative_eq!(out.virial[(0, 1)], out.virial[(1, 0)]);

        let mut excluded = topology.clone();
        excluded.pairs[0].virial = false;
        let out = field
            .evaluate(&positions(&[(1.0, 1.0), (1.9, 1.0)]), &cell(), &excluded)
            .unwrap();
        assert_eq!(out.virial, Matrix2::zeros());
    }
}
