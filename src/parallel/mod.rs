//! SPMD layer: the same integrator runs on every rank, collectives keep the
//! replicated state identical.
pub mod communicator;
pub mod coordinator;
pub mod threads;

pub use communicator::{Communicator, SelfComm};
pub use threads::{run_spmd, ThreadComm};
