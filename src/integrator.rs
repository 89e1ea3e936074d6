//! Langevin velocity-Verlet step, identical on every rank of a run.
use na::{DVector, Matrix2};
use rand::{rngs::SmallRng, SeedableRng};

use crate::beads::Beads;
use crate::ensemble::Ensemble;
use crate::errors::{Result, SimError};
use crate::parallel::{
    communicator::{Communicator, SelfComm},
    coordinator::{reduce_forces, synchronised_noise, verify_partition},
};
use crate::potentials::{ForceField, ForceOutput};
use crate::topology::{Topology, TopologySlice};

/// What a step hands back to the driving loop besides the mutated [`Beads`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub potential_energy: f64,
    pub virial: Matrix2<f64>,
    /// Squared distances of the non-bonded pairs evaluated on this rank
    pub pair_r2: DVector<f64>,
}

pub struct Integrator<C: Communicator, E: Ensemble> {
    comm: C,
    ensemble: E,
    force_field: ForceField,
    /// Interactions evaluated by this rank
    topology: Topology,
    dt: f64,
    rng: SmallRng,
}

impl<E: Ensemble> Integrator<SelfComm, E> {
    pub fn serial(
        ensemble: E,
        force_field: ForceField,
        topology: Topology,
        dt: f64,
        seed: u64,
    ) -> Result<Self> {
        Self::with_local_topology(SelfComm, ensemble, force_field, topology, dt, seed)
    }
}

impl<C: Communicator, E: Ensemble> Integrator<C, E> {
    /// Collective constructor: every rank passes the full topology and the
    /// slice it owns. Fails on every rank unless the slices partition the
    /// topology.
    pub fn distributed(
        mut comm: C,
        ensemble: E,
        force_field: ForceField,
        topology: &Topology,
        slice: &TopologySlice,
        dt: f64,
        seed: u64,
    ) -> Result<Self> {
        verify_partition(&mut comm, topology, slice)?;
        let local = topology.select(slice)?;
        Self::with_local_topology(comm, ensemble, force_field, local, dt, seed)
    }

    fn with_local_topology(
        comm: C,
        ensemble: E,
        force_field: ForceField,
        topology: Topology,
        dt: f64,
        seed: u64,
    ) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "timestep",
                value: dt,
            });
        }
        Ok(Self {
            comm,
            ensemble,
            force_field,
            topology,
            dt,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }

    /// Forces, energy and virial of the starting configuration.
    pub fn initialise(&mut self, beads: &mut Beads) -> Result<StepReport> {
        beads.wrap_positions();
        self.compute_forces(beads)
    }

    pub fn step(&mut self, beads: &mut Beads) -> Result<StepReport> {
        let beta = if self.ensemble.uses_noise() {
            Some(synchronised_noise(&mut self.comm, &mut self.rng, beads.n_beads)?)
        } else {
            None
        };

        let acceleration = beads.current_acceleration();
        beads.velocities += acceleration * self.dt;

        let mu = self.ensemble.volume_scale(beads)?;

        let d_vel = self
            .ensemble
            .velocity_increment(&beads.velocities, beta.as_ref());
        let displacement = (&beads.velocities + &d_vel * 0.5) * self.dt;
        beads.positions += displacement;
        beads.velocities += d_vel;

        if let Some(mu) = mu {
            beads.scale_box(mu)?;
        }
        beads.wrap_positions();

        self.compute_forces(beads)
    }

    fn compute_forces(&mut self, beads: &mut Beads) -> Result<StepReport> {
        let local = self
            .force_field
            .evaluate(&beads.positions, &beads.sim_box, &self.topology);
        let ForceOutput {
            potential_energy,
            forces,
            virial,
            pair_r2,
        } = reduce_forces(&mut self.comm, local, beads.n_beads)?;

        beads.forces = forces;
        beads.virial = virial;
        beads.potential_energy = potential_energy;

        Ok(StepReport {
            potential_energy,
            virial,
            pair_r2,
        })
    }
}
