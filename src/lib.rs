//! Langevin dynamics of a periodic 2D bead-spring network, evaluated serially
//! or cooperatively by SPMD ranks.
extern crate nalgebra as na;

pub mod args_parser;
pub mod beads;
pub mod constants;
pub mod ensemble;
pub mod errors;
pub mod extensions;
pub mod integrator;
pub mod math;
pub mod parallel;
pub mod params;
pub mod potentials;
pub mod readers;
pub mod simulation_box;
pub mod system;
pub mod topology;
pub mod writers;
