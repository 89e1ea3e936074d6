//! In-process SPMD ranks, one OS thread each, exchanging messages through
//! channels in a star around the root.
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;

use crate::constants::ROOT_RANK;
use crate::errors::{Result, SimError};
use crate::parallel::communicator::Communicator;

/// (sender rank, collective sequence number, payload)
type Message = (usize, u64, Vec<f64>);

pub struct ThreadComm {
    rank: usize,
    size: usize,
    seq: u64,
    inbox: Receiver<Message>,
    /// None on the root
    to_root: Option<Sender<Message>>,
    /// Root only, entry `n` reaches rank `n + 1`
    to_ranks: Vec<Sender<Message>>,
    /// Root only, messages that arrived ahead of the collective they belong to
    pending: Vec<Message>,
}

impl ThreadComm {
    /// Communicators for ranks `0..size`, in rank order.
    pub fn world(size: usize) -> Vec<ThreadComm> {
        let size = size.max(1);
        let (root_tx, root_rx) = unbounded();

        let mut to_ranks = Vec::with_capacity(size - 1);
        let mut inboxes = Vec::with_capacity(size - 1);
        for _ in 1..size {
            let (tx, rx) = unbounded();
            to_ranks.push(tx);
            inboxes.push(rx);
        }

        let mut comms = Vec::with_capacity(size);
        comms.push(ThreadComm {
            rank: ROOT_RANK,
            size,
            seq: 0,
            inbox: root_rx,
            to_root: None,
            to_ranks,
            pending: Vec::new(),
        });
        for (n, inbox) in inboxes.into_iter().enumerate() {
            comms.push(ThreadComm {
                rank: n + 1,
                size,
                seq: 0,
                inbox,
                to_root: Some(root_tx.clone()),
                to_ranks: Vec::new(),
                pending: Vec::new(),
            });
        }
        comms
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn send_to_root(&self, seq: u64, data: Vec<f64>) -> Result<()> {
        match &self.to_root {
            Some(tx) => tx
                .send((self.rank, seq, data))
                .map_err(|_| SimError::Communication { rank: ROOT_RANK }),
            None => Ok(()),
        }
    }

    fn receive_from_root(&self, seq: u64) -> Result<Vec<f64>> {
        let (_, msg_seq, payload) = self
            .inbox
            .recv()
            .map_err(|_| SimError::Communication { rank: ROOT_RANK })?;
        if msg_seq != seq {
            return Err(SimError::Communication { rank: ROOT_RANK });
        }
        Ok(payload)
    }

    fn receive_on_root(&mut self, rank: usize, seq: u64) -> Result<Vec<f64>> {
        if let Some(pos) = self
            .pending
            .iter()
            .position(|(from, s, _)| *from == rank && *s == seq)
        {
            return Ok(self.pending.swap_remove(pos).2);
        }
        loop {
            let msg = self
                .inbox
                .recv()
                .map_err(|_| SimError::Communication { rank })?;
            if msg.0 == rank && msg.1 == seq {
                return Ok(msg.2);
            }
            self.pending.push(msg);
        }
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast(&mut self, data: &mut Vec<f64>) -> Result<()> {
        let seq = self.next_seq();
        if self.is_root() {
            for (n, tx) in self.to_ranks.iter().enumerate() {
                tx.send((ROOT_RANK, seq, data.clone()))
                    .map_err(|_| SimError::Communication { rank: n + 1 })?;
            }
        } else {
            *data = self.receive_from_root(seq)?;
        }
        Ok(())
    }

    fn gather(&mut self, data: &[f64]) -> Result<Option<Vec<Vec<f64>>>> {
        let seq = self.next_seq();
        if !self.is_root() {
            self.send_to_root(seq, data.to_vec())?;
            return Ok(None);
        }
        let mut gathered = Vec::with_capacity(self.size);
        gathered.push(data.to_vec());
        for rank in 1..self.size {
            gathered.push(self.receive_on_root(rank, seq)?);
        }
        Ok(Some(gathered))
    }

    fn all_reduce_sum(&mut self, data: &mut [f64]) -> Result<()> {
        let mut total = match self.gather(data)? {
            Some(contributions) => {
                let mut total = vec![0.0; data.len()];
                for (rank, contribution) in contributions.iter().enumerate() {
                    if contribution.len() != total.len() {
                        return Err(SimError::Communication { rank });
                    }
                    for (t, c) in total.iter_mut().zip(contribution) {
                        *t += c;
                    }
                }
                total
            }
            None => Vec::new(),
        };
        self.broadcast(&mut total)?;
        if total.len() != data.len() {
            return Err(SimError::Communication { rank: ROOT_RANK });
        }
        data.copy_from_slice(&total);
        Ok(())
    }
}

/// Runs `f` once per rank on its own thread and returns the results in rank
/// order. A rank that panics is reported as a communication failure.
pub fn run_spmd<F, R>(size: usize, f: F) -> Result<Vec<R>>
where
    F: Fn(ThreadComm) -> R + Sync,
    R: Send,
{
    let comms = ThreadComm::world(size);
    debug!("starting {} SPMD ranks", comms.len());

    std::thread::scope(|scope| {
        let f = &f;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| scope.spawn(move || f(comm)))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| handle.join().map_err(|_| SimError::Communication { rank }))
            .collect()
    })
}
