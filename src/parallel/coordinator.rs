//! The collective steps of a distributed force evaluation: shared noise,
//! reduction of partial results and the partition check done at setup.
use log::debug;
use na::{Matrix2, Matrix2xX};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::errors::{Result, SimError};
use crate::parallel::communicator::Communicator;
use crate::potentials::ForceOutput;
use crate::topology::{Topology, TopologySlice};

/// status, energy and the four virial entries precede the forces
const HEADER_LEN: usize = 6;

pub fn draw_noise<R: Rng>(rng: &mut R, n_beads: usize) -> Matrix2xX<f64> {
    Matrix2xX::from_fn(n_beads, |_, _| rng.sample(StandardNormal))
}

/// Unit Gaussian noise drawn on the root and broadcast, so every rank applies
/// the same stochastic kick.
pub fn synchronised_noise<C, R>(comm: &mut C, rng: &mut R, n_beads: usize) -> Result<Matrix2xX<f64>>
where
    C: Communicator,
    R: Rng,
{
    if comm.size() == 1 {
        return Ok(draw_noise(rng, n_beads));
    }

    let mut buffer = if comm.is_root() {
        draw_noise(rng, n_beads).as_slice().to_vec()
    } else {
        Vec::new()
    };
    comm.broadcast(&mut buffer)?;

    let mut beta = Matrix2xX::zeros(n_beads);
    if buffer.len() != beta.len() {
        return Err(SimError::BeadCountMismatch {
            expected: beta.len(),
            found: buffer.len(),
        });
    }
    beta.as_mut_slice().copy_from_slice(&buffer);
    Ok(beta)
}

/// Sums the partial energy, forces and virial of every rank.
///
/// All ranks take part even when their own evaluation failed, the status word
/// turns a local failure into an error on every rank.
pub fn reduce_forces<C: Communicator>(
    comm: &mut C,
    local: Result<ForceOutput>,
    n_beads: usize,
) -> Result<ForceOutput> {
    let mut buffer = vec![0.0; HEADER_LEN + 2 * n_beads];
    match &local {
        Ok(out) if out.forces.ncols() == n_beads => {
            buffer[1] = out.potential_energy;
            buffer[2..HEADER_LEN].copy_from_slice(out.virial.as_slice());
            buffer[HEADER_LEN..].copy_from_slice(out.forces.as_slice());
        }
        _ => buffer[0] = 1.0,
    }

    comm.all_reduce_sum(&mut buffer)?;

    let mut out = local?;
    if out.forces.ncols() != n_beads {
        return Err(SimError::BeadCountMismatch {
            expected: n_beads,
            found: out.forces.ncols(),
        });
    }
    let failed = buffer[0].round() as usize;
    if failed > 0 {
        return Err(SimError::PeerFailure { failed });
    }

    out.potential_energy = buffer[1];
    out.virial = Matrix2::from_column_slice(&buffer[2..HEADER_LEN]);
    out.forces.as_mut_slice().copy_from_slice(&buffer[HEADER_LEN..]);
    Ok(out)
}

/// Checks collectively that the slices of all ranks own every interaction of
/// `topology` exactly once. Ids beyond the topology are reported against
/// interaction `topology.n_interactions()`.
pub fn verify_partition<C: Communicator>(
    comm: &mut C,
    topology: &Topology,
    slice: &TopologySlice,
) -> Result<()> {
    if let Some(loads) = comm.gather(&[slice.len() as f64])? {
        for (rank, load) in loads.iter().enumerate() {
            debug!("rank {} owns {} interactions", rank, load[0]);
        }
    }

    let n_interactions = topology.n_interactions();
    let mut owners = vec![0.0; n_interactions + 1];
    for id in slice.interaction_ids(topology) {
        owners[id.min(n_interactions)] += 1.0;
    }
    comm.all_reduce_sum(&mut owners)?;

    let stray = owners[n_interactions].round() as usize;
    if stray > 0 {
        return Err(SimError::PartitionMismatch {
            interaction: n_interactions,
            owners: stray,
        });
    }
    for (interaction, count) in owners[..n_interactions].iter().enumerate() {
        let count = count.round() as usize;
        if count != 1 {
            return Err(SimError::PartitionMismatch {
                interaction,
                owners: count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::{communicator::SelfComm, threads::run_spmd};
    use crate::topology::{Bond, PairInteraction};
    use rand::SeedableRng;

    fn topology() -> Topology {
        Topology::new(
            3,
            vec![Bond { i: 0, j: 1 }, Bond { i: 1, j: 2 }],
            vec![],
            vec![PairInteraction::new(0, 2, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn noise_is_identical_on_every_rank() {
        let results = run_spmd(3, |mut comm| {
            // only the root's generator matters
            let mut rng = rand::rngs::SmallRng::seed_from_u64(comm.rank() as u64);
            synchronised_noise(&mut comm, &mut rng, 4).unwrap()
        })
        .unwrap();
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0], results[2]);
        assert_eq!(results[0].ncols(), 4);
    }

    #[test]
    fn full_slice_passes_on_one_rank() {
        let topology = topology();
        verify_partition(&mut SelfComm, &topology, &TopologySlice::full(&topology)).unwrap();
    }

    #[test]
    fn overlapping_slices_fail_everywhere() {
        let topology = topology();
        let results = run_spmd(2, |mut comm| {
            let slice = TopologySlice::full(&topology);
            verify_partition(&mut comm, &topology, &slice)
        })
        .unwrap();
        for result in results {
            assert!(matches!(
                result,
                Err(SimError::PartitionMismatch {
                    interaction: 0,
                    owners: 2
                })
            ));
        }
    }

    #[test]
    fn uncovered_interaction_fails() {
        let topology = topology();
        let slice = TopologySlice {
            bonds: vec![0, 1],
            ..TopologySlice::default()
        };
        assert!(matches!(
            verify_partition(&mut SelfComm, &topology, &slice),
            Err(SimError::PartitionMismatch {
                interaction: 2,
                owners: 0
            })
        ));
    }

    #[test]
    fn local_failure_reaches_peers() {
        let results = run_spmd(3, |mut comm| {
            let local = if comm.rank() == 2 {
                Err(SimError::CoincidentBeads { i: 0, j: 1 })
            } else {
                Ok(ForceOutput::zeros(3))
            };
            reduce_forces(&mut comm, local, 3)
        })
        .unwrap();

        assert!(matches!(results[0], Err(SimError::PeerFailure { failed: 1 })));
        assert!(matches!(results[1], Err(SimError::PeerFailure { failed: 1 })));
        assert!(matches!(
            results[2],
            Err(SimError::CoincidentBeads { i: 0, j: 1 })
        ));
    }
}
