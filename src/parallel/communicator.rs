use crate::constants::ROOT_RANK;
use crate::errors::Result;

/// Collective operations over a fixed set of ranks. Every rank must call the
/// same collectives in the same order; each call blocks until all ranks arrive.
pub trait Communicator: Send {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn is_root(&self) -> bool {
        self.rank() == ROOT_RANK
    }

    /// The root's `data` replaces `data` on every other rank.
    fn broadcast(&mut self, data: &mut Vec<f64>) -> Result<()>;

    /// Contributions of all ranks in rank order, returned on the root only.
    fn gather(&mut self, data: &[f64]) -> Result<Option<Vec<Vec<f64>>>>;

    /// Element-wise sum over all ranks, the result lands on every rank.
    fn all_reduce_sum(&mut self, data: &mut [f64]) -> Result<()>;

    fn barrier(&mut self) -> Result<()> {
        self.all_reduce_sum(&mut [])
    }
}

/// The single-process communicator: every collective is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SelfComm;

impl Communicator for SelfComm {
    fn rank(&self) -> usize {
        ROOT_RANK
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast(&mut self, _data: &mut Vec<f64>) -> Result<()> {
        Ok(())
    }

    fn gather(&mut self, data: &[f64]) -> Result<Option<Vec<Vec<f64>>>> {
        Ok(Some(vec![data.to_vec()]))
    }

    fn all_reduce_sum(&mut self, _data: &mut [f64]) -> Result<()> {
        Ok(())
    }
}
