//! Static interaction lists: bonds, bending angles and non-bonded candidate pairs.
//!
//! The lists are sparse, each interaction appears exactly once. A rank in a
//! distributed run evaluates the subset named by its [`TopologySlice`].
use std::ops::Range;

use crate::errors::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

/// Bending triplet, `j` is the bead shared by the bonds i-j and j-k.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairInteraction {
    pub i: usize,
    pub j: usize,
    /// Scales the non-bonded potential, zero disables the pair
    pub coeff: f64,
    /// Whether the pair contributes to the virial tensor
    pub virial: bool,
}

impl PairInteraction {
    pub fn new(i: usize, j: usize, coeff: f64) -> Self {
        Self {
            i,
            j,
            coeff,
            virial: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub n_beads: usize,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub pairs: Vec<PairInteraction>,
}

impl Topology {
    pub fn new(
        n_beads: usize,
        bonds: Vec<Bond>,
        angles: Vec<Angle>,
        pairs: Vec<PairInteraction>,
    ) -> Result<Self> {
        let topology = Self {
            n_beads,
            bonds,
            angles,
            pairs,
        };
        topology.validate()?;
        Ok(topology)
    }

    /// Builds the topology with every pair of beads that is not directly
    /// bonded as a non-bonded candidate.
    pub fn with_non_bonded_pairs(
        n_beads: usize,
        bonds: Vec<Bond>,
        angles: Vec<Angle>,
        coeff: f64,
    ) -> Result<Self> {
        let mut topology = Self::new(n_beads, bonds, angles, Vec::new())?;
        let neighbours = topology.bonded_neighbours();

        let mut pairs = Vec::new();
        for i in 0..n_beads {
            for j in (i + 1)..n_beads {
                if neighbours[i].contains(&j) {
                    continue;
                }
                pairs.push(PairInteraction::new(i, j, coeff));
            }
        }
        topology.pairs = pairs;
        Ok(topology)
    }

    fn validate(&self) -> Result<()> {
        let check = |index: usize| -> Result<()> {
            if index >= self.n_beads {
                return Err(SimError::InvalidBeadIndex {
                    index,
                    n_beads: self.n_beads,
                });
            }
            Ok(())
        };

        for bond in &self.bonds {
            check(bond.i)?;
            check(bond.j)?;
            if bond.i == bond.j {
                return Err(SimError::SelfInteraction { index: bond.i });
            }
        }
        for angle in &self.angles {
            check(angle.i)?;
            check(angle.j)?;
            check(angle.k)?;
            if angle.i == angle.j || angle.k == angle.j || angle.i == angle.k {
                return Err(SimError::SelfInteraction { index: angle.j });
            }
        }
        for pair in &self.pairs {
            check(pair.i)?;
            check(pair.j)?;
            if pair.i == pair.j {
                return Err(SimError::SelfInteraction { index: pair.i });
            }
        }
        Ok(())
    }

    /// Per-bead adjacency lists of the bond graph.
    pub fn bonded_neighbours(&self) -> Vec<Vec<usize>> {
        let mut neighbours = vec![Vec::new(); self.n_beads];
        for bond in &self.bonds {
            neighbours[bond.i].push(bond.j);
            neighbours[bond.j].push(bond.i);
        }
        for list in neighbours.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        neighbours
    }

    /// Total number of interactions, the id space of [`TopologySlice`].
    pub fn n_interactions(&self) -> usize {
        self.bonds.len() + self.angles.len() + self.pairs.len()
    }

    /// Rank-local topology holding only the interactions named by `slice`.
    pub fn select(&self, slice: &TopologySlice) -> Result<Self> {
        fn pick<T: Copy>(items: &[T], ids: &[usize], offset: usize) -> Result<Vec<T>> {
            ids.iter()
                .map(|&id| {
                    items
                        .get(id)
                        .copied()
                        .ok_or(SimError::PartitionMismatch {
                            interaction: offset + id,
                            owners: 0,
                        })
                })
                .collect()
        }

        Ok(Self {
            n_beads: self.n_beads,
            bonds: pick(&self.bonds, &slice.bonds, 0)?,
            angles: pick(&self.angles, &slice.angles, self.bonds.len())?,
            pairs: pick(
                &self.pairs,
                &slice.pairs,
                self.bonds.len() + self.angles.len(),
            )?,
        })
    }
}

/// Ids of the bonds, angles and pairs one rank is responsible for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologySlice {
    pub bonds: Vec<usize>,
    pub angles: Vec<usize>,
    pub pairs: Vec<usize>,
}

impl TopologySlice {
    pub fn full(topology: &Topology) -> Self {
        Self {
            bonds: (0..topology.bonds.len()).collect(),
            angles: (0..topology.angles.len()).collect(),
            pairs: (0..topology.pairs.len()).collect(),
        }
    }

    /// Contiguous block partition of every list over `size` ranks.
    pub fn block(topology: &Topology, size: usize, rank: usize) -> Self {
        fn chunk(n: usize, size: usize, rank: usize) -> Range<usize> {
            (n * rank / size)..(n * (rank + 1) / size)
        }

        Self {
            bonds: chunk(topology.bonds.len(), size, rank).collect(),
            angles: chunk(topology.angles.len(), size, rank).collect(),
            pairs: chunk(topology.pairs.len(), size, rank).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bonds.len() + self.angles.len() + self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Global interaction ids, bonds first, then angles, then pairs.
    pub fn interaction_ids<'a>(&'a self, topology: &Topology) -> impl Iterator<Item = usize> + 'a {
        let angle_offset = topology.bonds.len();
        let pair_offset = angle_offset + topology.angles.len();
        self.bonds
            .iter()
            .copied()
            .chain(self.angles.iter().map(move |id| angle_offset + id))
            .chain(self.pairs.iter().map(move |id| pair_offset + id))
    }
}
